//! Industry Profiles - Content and Style Defaults per Vertical

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::families::{Props, SectionComponent, DEFAULT_FAMILY};

pub type IndustryId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub primary_light: String,
    pub primary_dark: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
    /// Stylesheet URL that loads both faces.
    #[serde(default)]
    pub resource_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCopy {
    pub headline: String,
    pub subheadline: String,
    pub primary_cta: String,
    pub secondary_cta: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitEntry {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub stat: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub role: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaCopy {
    pub headline: String,
    pub description: String,
    pub button: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterCopy {
    pub description: String,
}

/// Per-component override applied on top of the family blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionOverride {
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub props: Props,
}

/// A custom block injected into the family skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    /// Custom block id, e.g. `process-steps`.
    pub id: String,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub props: Props,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryProfile {
    pub id: IndustryId,
    pub name: String,
    pub tagline: String,
    pub colors: Palette,
    #[serde(default)]
    pub fonts: Option<FontPairing>,
    #[serde(default)]
    pub theme: Option<ThemeMode>,
    pub hero: HeroCopy,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
    #[serde(default)]
    pub benefits: Vec<BenefitEntry>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    pub cta: CtaCopy,
    pub footer: FooterCopy,
    #[serde(default)]
    pub header_style: Option<String>,
    #[serde(default)]
    pub template_family: Option<String>,
    #[serde(default)]
    pub section_overrides: BTreeMap<SectionComponent, SectionOverride>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    #[serde(default)]
    pub logos: Vec<String>,
}

/// Listing row for an industry, as served to pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustrySummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub tagline: &'a str,
    pub template_family: &'a str,
    pub header_style: Option<&'a str>,
}

impl IndustryProfile {
    pub fn summary(&self) -> IndustrySummary<'_> {
        IndustrySummary {
            id: &self.id,
            name: &self.name,
            tagline: &self.tagline,
            template_family: self.family_id(),
            header_style: self.header_style.as_deref(),
        }
    }

    /// The family this industry composes against.
    pub fn family_id(&self) -> &str {
        self.template_family.as_deref().unwrap_or(DEFAULT_FAMILY)
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.unwrap_or_default()
    }

    pub fn feature_enabled(&self, key: &str) -> bool {
        self.features.get(key).copied().unwrap_or(false)
    }
}

/// Industry catalog - immutable after construction
#[derive(Debug, Clone, Default)]
pub struct IndustryCatalog {
    industries: BTreeMap<IndustryId, IndustryProfile>,
}

impl IndustryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self, crate::catalog::CatalogError> {
        let mut catalog = Self::new();
        for profile in crate::catalog::read_json_dir::<IndustryProfile>(dir)? {
            catalog.register(profile);
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&IndustryProfile> {
        self.industries.get(id)
    }

    /// Profiles ordered by id.
    pub fn list(&self) -> Vec<&IndustryProfile> {
        self.industries.values().collect()
    }

    pub fn summaries(&self) -> Vec<IndustrySummary<'_>> {
        self.industries.values().map(IndustryProfile::summary).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.industries.keys().map(String::as_str)
    }

    pub fn register(&mut self, profile: IndustryProfile) {
        self.industries.insert(profile.id.clone(), profile);
    }
}
