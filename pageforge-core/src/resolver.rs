//! Blueprint Resolution - industry x family -> ordered page sections
//!
//! Resolution is a pure function of the catalog. Family blueprints are
//! copied before any override is applied, so callers are free to mutate
//! what they get back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::SectionEntry;
use crate::catalog::Catalog;
use crate::families::{Props, SectionComponent};
use crate::hashing::canonical_json;
use crate::industries::IndustryProfile;
use crate::merge::{merge_props, resolve_variant, VariantSource};
use crate::variants;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown industry: {0}")]
    UnknownIndustry(String),

    #[error("Industry {industry} references unknown template family: {family}")]
    UnknownTemplateFamily { industry: String, family: String },
}

/// A section ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSection {
    pub position: usize,
    pub component: SectionComponent,
    pub variant: String,
    pub variant_source: VariantSource,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

pub struct BlueprintResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> BlueprintResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    fn industry(&self, industry_id: &str) -> Result<&'a IndustryProfile, ResolveError> {
        self.catalog
            .industry(industry_id)
            .ok_or_else(|| ResolveError::UnknownIndustry(industry_id.to_string()))
    }

    /// Effective ordered section list for `industry_id`.
    pub fn resolve(&self, industry_id: &str) -> Result<Vec<ResolvedSection>, ResolveError> {
        let industry = self.industry(industry_id)?;
        let family_id = industry.family_id();
        let family = self.catalog.family(family_id).ok_or_else(|| {
            ResolveError::UnknownTemplateFamily {
                industry: industry.id.clone(),
                family: family_id.to_string(),
            }
        })?;

        let mut base = family.sections.clone();
        base.retain(|entry| {
            entry
                .enabled_key
                .as_deref()
                .map_or(true, |key| industry.feature_enabled(key))
        });

        let hero_at = base.iter().position(|e| e.component == SectionComponent::Hero);
        let mut injected: Vec<Vec<ResolvedSection>> = vec![vec![]; base.len()];
        let mut leading = vec![];

        for custom in &industry.custom_sections {
            let slot_at = custom
                .slot
                .as_deref()
                .and_then(|slot| base.iter().position(|e| e.slot.as_deref() == Some(slot)));
            let (variant, variant_source) =
                resolve_variant(SectionComponent::Custom, None, custom.variant.as_deref());
            let section = ResolvedSection {
                position: 0,
                component: SectionComponent::Custom,
                variant,
                variant_source,
                props: custom.props.clone(),
                custom: Some(custom.id.clone()),
            };
            match slot_at.or(hero_at) {
                Some(anchor) => injected[anchor].push(section),
                None => leading.push(section),
            }
        }

        let mut sections = leading;
        for (entry, extra) in base.into_iter().zip(injected) {
            let ov = industry.section_overrides.get(&entry.component);
            let (variant, variant_source) = resolve_variant(
                entry.component,
                entry.variant.as_deref(),
                ov.and_then(|o| o.variant.as_deref()),
            );
            let props = match ov {
                Some(o) => merge_props(&entry.props, &o.props),
                None => entry.props,
            };
            sections.push(ResolvedSection {
                position: 0,
                component: entry.component,
                variant,
                variant_source,
                props,
                custom: entry.custom,
            });
            sections.extend(extra);
        }

        for (i, section) in sections.iter_mut().enumerate() {
            section.position = i;
        }

        tracing::debug!(
            industry = %industry.id,
            family = %family_id,
            sections = sections.len(),
            "Resolved blueprint"
        );
        Ok(sections)
    }

    /// Rebuild resolved sections for an edited section list.
    ///
    /// Variants come from the entries (component default when unset); props
    /// come from the matching section of a fresh resolution, so an unedited
    /// list reproduces `resolve` exactly.
    pub fn resolve_entries(
        &self,
        industry_id: &str,
        entries: &[SectionEntry],
    ) -> Result<Vec<ResolvedSection>, ResolveError> {
        let fresh = self.resolve(industry_id)?;

        let sections = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let origin = fresh
                    .iter()
                    .find(|s| s.component == entry.component && s.custom == entry.custom);
                let (variant, variant_source) = match (&entry.variant, origin) {
                    (Some(v), Some(o)) if *v == o.variant => (v.clone(), o.variant_source),
                    (Some(v), _) => (v.clone(), VariantSource::Builder),
                    (None, _) => (
                        variants::default_variant(entry.component).to_string(),
                        VariantSource::ComponentDefault,
                    ),
                };
                ResolvedSection {
                    position,
                    component: entry.component,
                    variant,
                    variant_source,
                    props: origin.map(|o| o.props.clone()).unwrap_or_default(),
                    custom: entry.custom.clone(),
                }
            })
            .collect();

        Ok(sections)
    }

    /// Resolve every industry; the first failure is returned.
    pub fn resolve_all(&self) -> Result<Vec<(String, Vec<ResolvedSection>)>, ResolveError> {
        self.catalog
            .industries
            .ids()
            .map(|id| Ok((id.to_string(), self.resolve(id)?)))
            .collect()
    }
}

/// Stable hash of a resolved section list.
pub fn fingerprint(sections: &[ResolvedSection]) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(&sections)?;
    Ok(crate::hashing::sha256_hex(canonical.as_bytes()))
}
