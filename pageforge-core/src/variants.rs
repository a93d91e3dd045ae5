//! Variant Catalog - valid visual treatments per section component
//!
//! The first variant listed for a component is its default.

use crate::families::SectionComponent;

pub const HERO_VARIANTS: &[&str] = &["split", "centered", "editorial", "fullscreen", "minimal"];
pub const SERVICES_VARIANTS: &[&str] = &["cards", "grid", "list", "alternating"];
pub const BENEFITS_VARIANTS: &[&str] = &["grid", "stats", "split", "timeline"];
pub const TESTIMONIALS_VARIANTS: &[&str] = &["carousel", "grid", "single", "wall"];
pub const CTA_VARIANTS: &[&str] = &["banner", "split", "centered", "boxed"];
pub const LOGO_MARQUEE_VARIANTS: &[&str] = &["scroll", "static"];
pub const FOOTER_VARIANTS: &[&str] = &["columns", "simple", "centered"];
pub const CUSTOM_VARIANTS: &[&str] = &["default", "compact"];

pub const HEADER_VARIANTS: &[&str] = &["classic", "centered", "minimal", "transparent"];

/// Custom blocks a `Custom` entry may name.
pub const CUSTOM_BLOCKS: &[&str] = &["process-steps", "stats-band", "faq", "team-grid"];

pub fn variants_for(component: SectionComponent) -> &'static [&'static str] {
    match component {
        SectionComponent::Hero => HERO_VARIANTS,
        SectionComponent::Services => SERVICES_VARIANTS,
        SectionComponent::Benefits => BENEFITS_VARIANTS,
        SectionComponent::Testimonials => TESTIMONIALS_VARIANTS,
        SectionComponent::Cta => CTA_VARIANTS,
        SectionComponent::LogoMarquee => LOGO_MARQUEE_VARIANTS,
        SectionComponent::Footer => FOOTER_VARIANTS,
        SectionComponent::Custom => CUSTOM_VARIANTS,
    }
}

pub fn default_variant(component: SectionComponent) -> &'static str {
    variants_for(component)[0]
}

pub fn is_valid(component: SectionComponent, variant: &str) -> bool {
    variants_for(component).contains(&variant)
}

pub fn is_valid_header(variant: &str) -> bool {
    HEADER_VARIANTS.contains(&variant)
}

pub fn default_header() -> &'static str {
    HEADER_VARIANTS[0]
}

pub fn is_custom_block(id: &str) -> bool {
    CUSTOM_BLOCKS.contains(&id)
}
