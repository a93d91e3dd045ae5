//! Template Families - Reusable Page Skeletons

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub type FamilyId = String;

/// Family used when an industry does not name one.
pub const DEFAULT_FAMILY: &str = "professionalServices";

/// Free-form property bag attached to a section.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// The closed set of section components a page can be assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionComponent {
    Hero,
    Services,
    Benefits,
    Testimonials,
    #[serde(rename = "CTA")]
    Cta,
    LogoMarquee,
    Footer,
    Custom,
}

impl SectionComponent {
    pub const ALL: [SectionComponent; 8] = [
        SectionComponent::Hero,
        SectionComponent::Services,
        SectionComponent::Benefits,
        SectionComponent::Testimonials,
        SectionComponent::Cta,
        SectionComponent::LogoMarquee,
        SectionComponent::Footer,
        SectionComponent::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionComponent::Hero => "Hero",
            SectionComponent::Services => "Services",
            SectionComponent::Benefits => "Benefits",
            SectionComponent::Testimonials => "Testimonials",
            SectionComponent::Cta => "CTA",
            SectionComponent::LogoMarquee => "LogoMarquee",
            SectionComponent::Footer => "Footer",
            SectionComponent::Custom => "Custom",
        }
    }
}

impl fmt::Display for SectionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComponent(pub String);

impl fmt::Display for UnknownComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section component: {}", self.0)
    }
}

impl std::error::Error for UnknownComponent {}

impl FromStr for SectionComponent {
    type Err = UnknownComponent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionComponent::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

/// One row of a family skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBlueprint {
    pub component: SectionComponent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
    /// Feature flag on the industry that must be on for this entry to render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_key: Option<String>,
    /// Custom block id; only meaningful for `Custom` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    /// Named insertion point: injected custom sections targeting this slot
    /// land right after this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

impl SectionBlueprint {
    pub fn new(component: SectionComponent) -> Self {
        Self {
            component,
            variant: None,
            props: Props::new(),
            enabled_key: None,
            custom: None,
            slot: None,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFamily {
    pub id: FamilyId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sections: Vec<SectionBlueprint>,
}

impl TemplateFamily {
    /// Index of the entry declaring `slot`, if any.
    pub fn slot_position(&self, slot: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.slot.as_deref() == Some(slot))
    }

    pub fn has_component(&self, component: SectionComponent) -> bool {
        self.sections.iter().any(|s| s.component == component)
    }
}

/// Family registry - read-only once built
#[derive(Debug, Clone, Default)]
pub struct TemplateFamilyRegistry {
    families: BTreeMap<FamilyId, TemplateFamily>,
}

impl TemplateFamilyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` family file in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, crate::catalog::CatalogError> {
        let mut registry = Self::new();
        for family in crate::catalog::read_json_dir::<TemplateFamily>(dir)? {
            registry.register(family);
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&TemplateFamily> {
        self.families.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.families.contains_key(id)
    }

    pub fn list(&self) -> Vec<&TemplateFamily> {
        self.families.values().collect()
    }

    pub fn register(&mut self, family: TemplateFamily) {
        self.families.insert(family.id.clone(), family);
    }
}
