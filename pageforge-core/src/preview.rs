//! Preview Route Contract
//!
//! The builder and the preview renderer share nothing but this query
//! string: `industry`, `header`, `fonts`, `colors` and `blueprint`, where
//! `blueprint` is a JSON array of `{component, variant}` entries. The
//! renderer rebuilds the page from these parameters alone. An absent
//! `blueprint` means the industry's own resolution; an empty one is an
//! empty page.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::builder::SectionEntry;
use crate::catalog::Catalog;
use crate::families::SectionComponent;
use crate::render::{PageContext, RenderError, Renderer};
use crate::resolver::{BlueprintResolver, ResolveError};
use crate::theme::{SurfaceColors, ThemeCatalog, ThemeError, DEFAULT_ID};
use crate::variants;

pub const PREVIEW_PATH: &str = "/preview";

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Missing query parameter: {0}")]
    MissingParam(&'static str),

    #[error("Invalid blueprint parameter: {0}")]
    BadBlueprint(#[from] serde_json::Error),

    #[error("Invalid preview base URL: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("Unknown {component} variant: {variant}")]
    UnknownVariant { component: SectionComponent, variant: String },

    #[error("Unknown header variant: {0}")]
    UnknownHeader(String),

    #[error("Unknown custom block: {0}")]
    UnknownCustomBlock(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewQuery {
    pub industry: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub fonts: Option<String>,
    #[serde(default)]
    pub colors: Option<String>,
    #[serde(default)]
    pub blueprint: Option<Vec<SectionEntry>>,
}

fn non_default(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| *v != DEFAULT_ID)
}

impl PreviewQuery {
    /// Encoded query pairs; `fonts`/`colors` are dropped when "default".
    pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>, PreviewError> {
        let mut pairs = vec![("industry", self.industry.clone())];
        if let Some(header) = &self.header {
            pairs.push(("header", header.clone()));
        }
        if let Some(fonts) = non_default(&self.fonts) {
            pairs.push(("fonts", fonts.to_string()));
        }
        if let Some(colors) = non_default(&self.colors) {
            pairs.push(("colors", colors.to_string()));
        }
        if let Some(blueprint) = &self.blueprint {
            pairs.push(("blueprint", serde_json::to_string(blueprint)?));
        }
        Ok(pairs)
    }

    pub fn to_url(&self, base: &Url) -> Result<Url, PreviewError> {
        let mut url = base.join(PREVIEW_PATH.trim_start_matches('/'))?;
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in self.to_pairs()? {
                query.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    /// Parse decoded key/value pairs. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, PreviewError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut industry = None;
        let mut header = None;
        let mut fonts = None;
        let mut colors = None;
        let mut blueprint = None;

        for (key, value) in pairs {
            let value: String = value.into();
            match key.as_ref() {
                "industry" => industry = Some(value),
                "header" => header = Some(value),
                "fonts" => fonts = Some(value),
                "colors" => colors = Some(value),
                "blueprint" => blueprint = Some(serde_json::from_str::<Vec<SectionEntry>>(&value)?),
                _ => {}
            }
        }

        Ok(Self {
            industry: industry.ok_or(PreviewError::MissingParam("industry"))?,
            header,
            fonts,
            colors,
            blueprint,
        })
    }

    pub fn from_url(url: &Url) -> Result<Self, PreviewError> {
        Self::from_pairs(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    /// Reject anything the renderer would otherwise have to guess about.
    fn check_variants(&self, themes: &ThemeCatalog) -> Result<(), PreviewError> {
        if let Some(fonts) = self.fonts.as_deref().filter(|id| !themes.has_fonts(id)) {
            return Err(ThemeError::UnknownFontCombo(fonts.to_string()).into());
        }
        if let Some(colors) = self.colors.as_deref().filter(|id| !themes.has_colors(id)) {
            return Err(ThemeError::UnknownColorScheme(colors.to_string()).into());
        }
        if let Some(header) = &self.header {
            if !variants::is_valid_header(header) {
                return Err(PreviewError::UnknownHeader(header.clone()));
            }
        }
        for entry in self.blueprint.iter().flatten() {
            if let Some(variant) = &entry.variant {
                if !variants::is_valid(entry.component, variant) {
                    return Err(PreviewError::UnknownVariant {
                        component: entry.component,
                        variant: variant.clone(),
                    });
                }
            }
            if entry.component == SectionComponent::Custom {
                let block = entry.custom.as_deref().unwrap_or_default();
                if !variants::is_custom_block(block) {
                    return Err(PreviewError::UnknownCustomBlock(block.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Build the render context for a preview query.
///
/// Without a blueprint the industry's own resolution is rendered.
pub fn page_context<'a>(catalog: &'a Catalog, query: &PreviewQuery) -> Result<PageContext<'a>, PreviewError> {
    query.check_variants(&catalog.themes)?;

    let resolver = BlueprintResolver::new(catalog);
    let sections = match &query.blueprint {
        Some(entries) => resolver.resolve_entries(&query.industry, entries)?,
        None => resolver.resolve(&query.industry)?,
    };

    let industry = catalog
        .industry(&query.industry)
        .ok_or_else(|| ResolveError::UnknownIndustry(query.industry.clone()))?;
    let fonts = catalog
        .themes
        .resolve_fonts(query.fonts.as_deref().unwrap_or(DEFAULT_ID), industry)?;
    let colors = catalog
        .themes
        .resolve_colors(query.colors.as_deref().unwrap_or(DEFAULT_ID), industry)?;
    let surfaces = SurfaceColors::derive(&colors, industry.theme_mode());
    let header = query
        .header
        .clone()
        .or_else(|| industry.header_style.clone())
        .unwrap_or_else(|| variants::default_header().to_string());

    Ok(PageContext {
        industry,
        header,
        fonts,
        colors,
        surfaces,
        sections,
    })
}

/// Render the full preview page for `query`.
pub fn render_preview(catalog: &Catalog, renderer: &Renderer, query: &PreviewQuery) -> Result<String, PreviewError> {
    let context = page_context(catalog, query)?;
    Ok(renderer.render_page(&context)?)
}
