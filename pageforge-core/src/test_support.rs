//! Fixture catalog shared by unit tests.

use serde_json::json;

use crate::catalog::{Catalog, CatalogManifest};
use crate::families::{SectionBlueprint, SectionComponent, TemplateFamily, TemplateFamilyRegistry, DEFAULT_FAMILY};
use crate::industries::{IndustryCatalog, IndustryProfile};

pub fn family() -> TemplateFamily {
    let mut hero = SectionBlueprint::new(SectionComponent::Hero).with_variant("split");
    hero.props = json!({"align": "left"}).as_object().cloned().unwrap();

    TemplateFamily {
        id: DEFAULT_FAMILY.to_string(),
        name: "Professional Services".to_string(),
        description: String::new(),
        sections: vec![
            hero,
            SectionBlueprint::new(SectionComponent::Services).with_variant("cards"),
            SectionBlueprint::new(SectionComponent::Benefits).with_variant("grid"),
            SectionBlueprint::new(SectionComponent::Testimonials).with_variant("carousel"),
            SectionBlueprint::new(SectionComponent::Cta).with_variant("banner"),
            SectionBlueprint::new(SectionComponent::Footer).with_variant("columns"),
        ],
    }
}

pub fn industry(id: &str) -> IndustryProfile {
    serde_json::from_value(json!({
        "id": id,
        "name": id.to_uppercase(),
        "tagline": format!("{} you can trust", id),
        "colors": {"primary": "#1e3a8a", "primaryLight": "#3b82f6", "primaryDark": "#172554", "accent": "#f59e0b"},
        "hero": {
            "headline": format!("{} headline", id),
            "subheadline": "Sub",
            "primaryCta": "Book a call",
            "secondaryCta": "Learn more"
        },
        "services": [{"icon": "briefcase", "title": "Advisory", "description": "Plain advice."}],
        "benefits": [{"title": "Experience", "description": "Decades of it.", "stat": "25+"}],
        "testimonials": [{"quote": "Great.", "author": "Ana", "role": "Owner", "company": "Ana & Co"}],
        "cta": {"headline": "Ready?", "description": "Talk to us.", "button": "Start"},
        "footer": {"description": "Serving the region since 1999."}
    }))
    .unwrap()
}

pub fn catalog_with(industries: Vec<IndustryProfile>, families: Vec<TemplateFamily>) -> Catalog {
    let mut ic = IndustryCatalog::new();
    for i in industries {
        ic.register(i);
    }
    let mut fr = TemplateFamilyRegistry::new();
    for f in families {
        fr.register(f);
    }
    Catalog::new(CatalogManifest::default(), ic, fr).unwrap()
}
