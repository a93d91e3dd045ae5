//! Section Component Library
//!
//! Each section component is a minijinja template receiving
//! `(industry, section)`; the variant picks the markup path through
//! class names and conditionals. Output is deterministic for a given
//! industry, variant and props.

use minijinja::{context, Environment, UndefinedBehavior, Value};
use serde::Serialize;
use thiserror::Error;

use crate::families::SectionComponent;
use crate::industries::{FontPairing, IndustryProfile, Palette, ThemeMode};
use crate::resolver::ResolvedSection;
use crate::theme::SurfaceColors;

pub const DOCTYPE: &str = "<!DOCTYPE html>";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Everything the page shell and its sections are rendered from.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext<'a> {
    pub industry: &'a IndustryProfile,
    pub header: String,
    pub fonts: FontPairing,
    pub colors: Palette,
    pub surfaces: SurfaceColors,
    pub sections: Vec<ResolvedSection>,
}

impl PageContext<'_> {
    /// Image sources referenced by the rendered sections, in page order.
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources = vec![];
        for section in &self.sections {
            for key in ["backgroundImage", "image"] {
                if let Some(src) = section.props.get(key).and_then(|v| v.as_str()) {
                    sources.push(src.to_string());
                }
            }
            if section.component == SectionComponent::LogoMarquee {
                sources.extend(self.industry.logos.iter().cloned());
            }
        }
        sources
    }
}

const TEMPLATES: &[(&str, &str)] = &[
    ("page.html", include_str!("../templates/page.html")),
    ("sections/hero.html", include_str!("../templates/sections/hero.html")),
    ("sections/services.html", include_str!("../templates/sections/services.html")),
    ("sections/benefits.html", include_str!("../templates/sections/benefits.html")),
    ("sections/testimonials.html", include_str!("../templates/sections/testimonials.html")),
    ("sections/cta.html", include_str!("../templates/sections/cta.html")),
    ("sections/logo_marquee.html", include_str!("../templates/sections/logo_marquee.html")),
    ("sections/footer.html", include_str!("../templates/sections/footer.html")),
    ("sections/custom.html", include_str!("../templates/sections/custom.html")),
];

fn template_name(component: SectionComponent) -> &'static str {
    match component {
        SectionComponent::Hero => "sections/hero.html",
        SectionComponent::Services => "sections/services.html",
        SectionComponent::Benefits => "sections/benefits.html",
        SectionComponent::Testimonials => "sections/testimonials.html",
        SectionComponent::Cta => "sections/cta.html",
        SectionComponent::LogoMarquee => "sections/logo_marquee.html",
        SectionComponent::Footer => "sections/footer.html",
        SectionComponent::Custom => "sections/custom.html",
    }
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        // Sections without props serialize without a `props` key.
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render_section(&self, industry: &IndustryProfile, section: &ResolvedSection) -> Result<String, RenderError> {
        let template = self.env.get_template(template_name(section.component))?;
        Ok(template.render(context! { industry => industry, section => section })?)
    }

    /// The `<html>` root element.
    pub fn render_root(&self, page: &PageContext<'_>) -> Result<String, RenderError> {
        let body = page
            .sections
            .iter()
            .map(|s| self.render_section(page.industry, s))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let theme = match page.industry.theme_mode() {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        let template = self.env.get_template("page.html")?;
        Ok(template.render(context! {
            page => page,
            theme => theme,
            body => Value::from_safe_string(body),
        })?)
    }

    /// A complete standalone document.
    pub fn render_page(&self, page: &PageContext<'_>) -> Result<String, RenderError> {
        Ok(format!("{}\n{}", DOCTYPE, self.render_root(page)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::VariantSource;
    use crate::test_support::industry;
    use serde_json::json;

    fn section(component: SectionComponent, variant: &str) -> ResolvedSection {
        ResolvedSection {
            position: 0,
            component,
            variant: variant.to_string(),
            variant_source: VariantSource::Family,
            props: Default::default(),
            custom: None,
        }
    }

    #[test]
    fn test_every_component_renders() {
        let renderer = Renderer::new().unwrap();
        let law = industry("law");
        for component in SectionComponent::ALL {
            let mut s = section(component, crate::variants::default_variant(component));
            if component == SectionComponent::Custom {
                s.custom = Some("faq".to_string());
            }
            let html = renderer.render_section(&law, &s).unwrap();
            assert!(html.contains(&format!(r#"data-component="{}""#, component)), "{}", html);
        }
    }

    #[test]
    fn test_variant_and_props_reach_markup() {
        let renderer = Renderer::new().unwrap();
        let law = industry("law");
        let mut hero = section(SectionComponent::Hero, "editorial");
        hero.props = json!({"backgroundImage": "/img/law.jpg"}).as_object().cloned().unwrap();

        let html = renderer.render_section(&law, &hero).unwrap();
        assert!(html.contains("hero--editorial"));
        // Auto-escape encodes `/` inside attribute values.
        assert!(html.contains(r#"src="&#x2f;img&#x2f;law.jpg""#), "{}", html);
        assert!(html.contains("law headline"));
    }

    #[test]
    fn test_copy_is_escaped() {
        let renderer = Renderer::new().unwrap();
        let mut law = industry("law");
        law.hero.headline = "<script>alert(1)</script>".to_string();
        let html = renderer.render_section(&law, &section(SectionComponent::Hero, "split")).unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = Renderer::new().unwrap();
        let law = industry("law");
        let s = section(SectionComponent::Services, "grid");
        assert_eq!(
            renderer.render_section(&law, &s).unwrap(),
            renderer.render_section(&law, &s).unwrap()
        );
    }
}
