//! Builder Session - the live, mutable draft behind the page composer
//!
//! The section list is the only source of render order. Mutations touch the
//! draft only; catalog data is never reachable through it. Stale indices
//! (a UI racing a removal with an edit) are silent no-ops.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::catalog::Catalog;
use crate::families::SectionComponent;
use crate::preview::{PreviewError, PreviewQuery};
use crate::resolver::{BlueprintResolver, ResolveError, ResolvedSection};
use crate::theme::DEFAULT_ID;
use crate::variants;

/// Industry selected when a builder opens.
pub const DEFAULT_INDUSTRY: &str = "accounting";

/// One row of the draft, also the wire shape of the preview `blueprint` param.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub component: SectionComponent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

impl SectionEntry {
    pub fn new(component: SectionComponent, variant: Option<&str>) -> Self {
        Self {
            component,
            variant: variant.map(str::to_string),
            custom: None,
        }
    }

    /// Shape appended by `add_section`.
    pub fn default_entry() -> Self {
        Self::new(SectionComponent::Services, Some("cards"))
    }
}

impl From<&ResolvedSection> for SectionEntry {
    fn from(section: &ResolvedSection) -> Self {
        Self {
            component: section.component,
            variant: Some(section.variant.clone()),
            custom: section.custom.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A single-field edit of a draft section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionUpdate {
    Component(SectionComponent),
    Variant(Option<String>),
}

#[derive(Debug, Clone)]
pub struct BuilderState {
    catalog: Arc<Catalog>,
    industry_id: String,
    header_variant: String,
    font_combo: String,
    color_scheme: String,
    sections: Vec<SectionEntry>,
    exporting: bool,
    chrome_hidden: bool,
    preview_refresh: u64,
}

impl BuilderState {
    pub fn new(catalog: Arc<Catalog>, industry_id: &str) -> Result<Self, ResolveError> {
        let mut state = Self {
            catalog,
            industry_id: String::new(),
            header_variant: variants::default_header().to_string(),
            font_combo: DEFAULT_ID.to_string(),
            color_scheme: DEFAULT_ID.to_string(),
            sections: vec![],
            exporting: false,
            chrome_hidden: false,
            preview_refresh: 0,
        };
        state.select_industry(industry_id)?;
        Ok(state)
    }

    pub fn with_default_industry(catalog: Arc<Catalog>) -> Result<Self, ResolveError> {
        Self::new(catalog, DEFAULT_INDUSTRY)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn industry_id(&self) -> &str {
        &self.industry_id
    }

    pub fn header_variant(&self) -> &str {
        &self.header_variant
    }

    pub fn font_combo(&self) -> &str {
        &self.font_combo
    }

    pub fn color_scheme(&self) -> &str {
        &self.color_scheme
    }

    pub fn sections(&self) -> &[SectionEntry] {
        &self.sections
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn is_chrome_hidden(&self) -> bool {
        self.chrome_hidden
    }

    pub fn preview_refresh(&self) -> u64 {
        self.preview_refresh
    }

    fn touch(&mut self) {
        self.preview_refresh += 1;
    }

    /// Switch industry. The draft is replaced wholesale by the fresh
    /// resolution; manual edits do not survive. On error nothing changes.
    pub fn select_industry(&mut self, industry_id: &str) -> Result<(), ResolveError> {
        let resolved = BlueprintResolver::new(&self.catalog).resolve(industry_id)?;
        let header = self
            .catalog
            .industry(industry_id)
            .and_then(|i| i.header_style.clone())
            .unwrap_or_else(|| variants::default_header().to_string());

        self.sections = resolved.iter().map(SectionEntry::from).collect();
        self.industry_id = industry_id.to_string();
        self.header_variant = header;
        self.touch();

        tracing::info!(industry = %industry_id, sections = self.sections.len(), "Builder reset to industry");
        Ok(())
    }

    pub fn set_header_variant(&mut self, variant: impl Into<String>) {
        self.header_variant = variant.into();
        self.touch();
    }

    pub fn set_font_combo(&mut self, id: impl Into<String>) {
        self.font_combo = id.into();
        self.touch();
    }

    pub fn set_color_scheme(&mut self, id: impl Into<String>) {
        self.color_scheme = id.into();
        self.touch();
    }

    /// A component change keeps the variant only when the new component
    /// has it, and drops the custom block id unless the entry stays Custom.
    pub fn update_section(&mut self, index: usize, update: SectionUpdate) {
        let Some(entry) = self.sections.get_mut(index) else { return };
        match update {
            SectionUpdate::Component(component) => {
                entry.component = component;
                if !entry.variant.as_deref().map_or(true, |v| variants::is_valid(component, v)) {
                    entry.variant = None;
                }
                if component != SectionComponent::Custom {
                    entry.custom = None;
                }
            }
            SectionUpdate::Variant(variant) => entry.variant = variant,
        }
        self.touch();
    }

    pub fn move_section(&mut self, index: usize, direction: Direction) {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.sections.len() && target < self.sections.len() => {
                self.sections.swap(index, target);
                self.touch();
            }
            _ => {}
        }
    }

    pub fn remove_section(&mut self, index: usize) {
        if index < self.sections.len() {
            self.sections.remove(index);
            self.touch();
        }
    }

    pub fn add_section(&mut self) {
        self.sections.push(SectionEntry::default_entry());
        self.touch();
    }

    /// Query parameters describing the current draft.
    pub fn preview_query(&self) -> PreviewQuery {
        PreviewQuery {
            industry: self.industry_id.clone(),
            header: Some(self.header_variant.clone()),
            fonts: Some(self.font_combo.clone()),
            colors: Some(self.color_scheme.clone()),
            blueprint: Some(self.sections.clone()),
        }
    }

    /// Preview URL under `base`, derived synchronously from current state.
    pub fn preview_url(&self, base: &Url) -> Result<Url, PreviewError> {
        self.preview_query().to_url(base)
    }

    /// File name the export is saved under.
    pub fn export_filename(&self) -> String {
        format!("{}-landing-page.html", self.industry_id)
    }

    pub(crate) fn set_capturing(&mut self, capturing: bool) {
        self.exporting = capturing;
        self.chrome_hidden = capturing;
    }
}
