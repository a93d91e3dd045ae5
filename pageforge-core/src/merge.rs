//! Override Precedence
//!
//! Every effective value on a resolved section comes from exactly one
//! authority: industry override > family default > component default.

use serde::{Deserialize, Serialize};

use crate::families::{Props, SectionComponent};
use crate::variants;

/// Where an effective variant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantSource {
    /// Component default from the variant catalog (fallback)
    ComponentDefault,
    /// Template family blueprint entry
    Family,
    /// Per-industry section override
    Industry,
    /// Chosen in the builder
    Builder,
}

impl Default for VariantSource {
    fn default() -> Self {
        Self::ComponentDefault
    }
}

/// Pick the effective variant for a section.
pub fn resolve_variant(
    component: SectionComponent,
    family: Option<&str>,
    industry: Option<&str>,
) -> (String, VariantSource) {
    match (industry, family) {
        (Some(v), _) => (v.to_string(), VariantSource::Industry),
        (None, Some(v)) => (v.to_string(), VariantSource::Family),
        (None, None) => (
            variants::default_variant(component).to_string(),
            VariantSource::ComponentDefault,
        ),
    }
}

/// Shallow merge: top-level keys of `overrides` replace those in `base`;
/// nested objects are replaced whole, never merged.
pub fn merge_props(base: &Props, overrides: &Props) -> Props {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Props {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_variant_precedence() {
        let hero = SectionComponent::Hero;
        assert_eq!(
            resolve_variant(hero, Some("split"), Some("editorial")),
            ("editorial".to_string(), VariantSource::Industry)
        );
        assert_eq!(
            resolve_variant(hero, Some("centered"), None),
            ("centered".to_string(), VariantSource::Family)
        );
        assert_eq!(
            resolve_variant(hero, None, None),
            ("split".to_string(), VariantSource::ComponentDefault)
        );
    }

    #[test]
    fn test_override_keys_win() {
        let base = props(json!({"align": "left", "overlay": 0.4}));
        let over = props(json!({"overlay": 0.7, "backgroundImage": "/img/law.jpg"}));
        let merged = merge_props(&base, &over);
        assert_eq!(merged, props(json!({"align": "left", "overlay": 0.7, "backgroundImage": "/img/law.jpg"})));
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = props(json!({"stats": {"years": 20, "clients": 500}}));
        let over = props(json!({"stats": {"years": 25}}));
        let merged = merge_props(&base, &over);
        assert_eq!(merged["stats"], json!({"years": 25}));
    }

    #[test]
    fn test_merge_leaves_inputs_untouched() {
        let base = props(json!({"a": 1}));
        let over = props(json!({"a": 2}));
        let _ = merge_props(&base, &over);
        assert_eq!(base["a"], json!(1));
    }
}
