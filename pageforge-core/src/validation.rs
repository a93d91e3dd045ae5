//! Catalog Validation - Rule/Policy Separation
//!
//! Rules produce structured violations over the whole static catalog.
//! Policy: any error makes the catalog invalid, warnings never block.

use serde::{Deserialize, Serialize};

use crate::families::{SectionComponent, TemplateFamily, TemplateFamilyRegistry};
use crate::industries::{IndustryCatalog, IndustryProfile};
use crate::variants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    /// `industry:<id>` or `family:<id>`
    pub subject: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<CatalogViolation>,
    pub industries_checked: usize,
    pub families_checked: usize,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CatalogViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CatalogViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

/// Read-only view handed to each rule.
pub struct CatalogView<'a> {
    pub industries: &'a IndustryCatalog,
    pub families: &'a TemplateFamilyRegistry,
}

impl<'a> CatalogView<'a> {
    fn family_of(&self, industry: &IndustryProfile) -> Option<&'a TemplateFamily> {
        self.families.get(industry.family_id())
    }
}

/// Validation rule trait - produces violations
pub trait CatalogRule {
    fn name(&self) -> &'static str;
    fn validate(&self, view: &CatalogView<'_>) -> Vec<CatalogViolation>;
}

fn industry_subject(industry: &IndustryProfile) -> String {
    format!("industry:{}", industry.id)
}

fn family_subject(family: &TemplateFamily) -> String {
    format!("family:{}", family.id)
}

fn bad_variant(
    rule: &str,
    subject: String,
    component: SectionComponent,
    variant: &str,
    context: &str,
) -> CatalogViolation {
    CatalogViolation {
        rule: rule.to_string(),
        severity: ViolationSeverity::Error,
        subject,
        message: format!("Unknown {} variant in {}", component, context),
        expected: Some(variants::variants_for(component).join(", ")),
        actual: Some(variant.to_string()),
        remediation: vec![format!("Use one of the registered {} variants", component)],
    }
}

// --- Concrete Rules ---

pub struct FamilyReferenceRule;

impl CatalogRule for FamilyReferenceRule {
    fn name(&self) -> &'static str { "family_reference" }

    fn validate(&self, view: &CatalogView<'_>) -> Vec<CatalogViolation> {
        view.industries
            .list()
            .into_iter()
            .filter(|i| !view.families.contains(i.family_id()))
            .map(|i| CatalogViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                subject: industry_subject(i),
                message: "Template family is not registered".to_string(),
                expected: Some(
                    view.families.list().iter().map(|f| f.id.as_str()).collect::<Vec<_>>().join(", "),
                ),
                actual: Some(i.family_id().to_string()),
                remediation: vec!["Fix templateFamily or register the family".to_string()],
            })
            .collect()
    }
}

pub struct NonEmptyRule;

impl CatalogRule for NonEmptyRule {
    fn name(&self) -> &'static str { "non_empty" }

    fn validate(&self, view: &CatalogView<'_>) -> Vec<CatalogViolation> {
        let mut violations = vec![];

        for family in view.families.list() {
            if family.sections.is_empty() {
                violations.push(CatalogViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    subject: family_subject(family),
                    message: "Family blueprint has no sections".to_string(),
                    expected: Some("at least 1 section".to_string()),
                    actual: Some("0 sections".to_string()),
                    remediation: vec!["Add sections to the family blueprint".to_string()],
                });
            }
        }

        for industry in view.industries.list() {
            let Some(family) = view.family_of(industry) else { continue };
            let visible = family
                .sections
                .iter()
                .filter(|s| s.enabled_key.as_deref().map_or(true, |k| industry.feature_enabled(k)))
                .count()
                + industry.custom_sections.len();
            if visible == 0 && !family.sections.is_empty() {
                violations.push(CatalogViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    subject: industry_subject(industry),
                    message: "Every section is disabled by feature flags".to_string(),
                    expected: Some("at least 1 enabled section".to_string()),
                    actual: Some("0 sections".to_string()),
                    remediation: vec!["Enable at least one feature the family depends on".to_string()],
                });
            }
        }

        violations
    }
}

pub struct VariantNameRule;

impl CatalogRule for VariantNameRule {
    fn name(&self) -> &'static str { "variant_name" }

    fn validate(&self, view: &CatalogView<'_>) -> Vec<CatalogViolation> {
        let mut violations = vec![];

        for family in view.families.list() {
            for (i, entry) in family.sections.iter().enumerate() {
                if let Some(variant) = &entry.variant {
                    if !variants::is_valid(entry.component, variant) {
                        violations.push(bad_variant(
                            self.name(),
                            family_subject(family),
                            entry.component,
                            variant,
                            &format!("section {}", i),
                        ));
                    }
                }
            }
        }

        for industry in view.industries.list() {
            for (component, ov) in &industry.section_overrides {
                if let Some(variant) = &ov.variant {
                    if !variants::is_valid(*component, variant) {
                        violations.push(bad_variant(
                            self.name(),
                            industry_subject(industry),
                            *component,
                            variant,
                            "sectionOverrides",
                        ));
                    }
                }
            }
            for custom in &industry.custom_sections {
                if let Some(variant) = &custom.variant {
                    if !variants::is_valid(SectionComponent::Custom, variant) {
                        violations.push(bad_variant(
                            self.name(),
                            industry_subject(industry),
                            SectionComponent::Custom,
                            variant,
                            &format!("custom section {}", custom.id),
                        ));
                    }
                }
            }
            if let Some(header) = &industry.header_style {
                if !variants::is_valid_header(header) {
                    violations.push(CatalogViolation {
                        rule: self.name().to_string(),
                        severity: ViolationSeverity::Error,
                        subject: industry_subject(industry),
                        message: "Unknown header style".to_string(),
                        expected: Some(variants::HEADER_VARIANTS.join(", ")),
                        actual: Some(header.clone()),
                        remediation: vec!["Use one of the registered header variants".to_string()],
                    });
                }
            }
        }

        violations
    }
}

pub struct CustomBlockRule;

impl CatalogRule for CustomBlockRule {
    fn name(&self) -> &'static str { "custom_block" }

    fn validate(&self, view: &CatalogView<'_>) -> Vec<CatalogViolation> {
        let mut violations = vec![];
        let unknown = |subject: String, actual: Option<String>| CatalogViolation {
            rule: self.name().to_string(),
            severity: ViolationSeverity::Error,
            subject,
            message: "Custom section names no known block".to_string(),
            expected: Some(variants::CUSTOM_BLOCKS.join(", ")),
            actual,
            remediation: vec!["Set `custom` to a registered block id".to_string()],
        };

        for family in view.families.list() {
            for entry in family.sections.iter().filter(|s| s.component == SectionComponent::Custom) {
                if !entry.custom.as_deref().map_or(false, variants::is_custom_block) {
                    violations.push(unknown(family_subject(family), entry.custom.clone()));
                }
            }
        }

        for industry in view.industries.list() {
            for custom in &industry.custom_sections {
                if !variants::is_custom_block(&custom.id) {
                    violations.push(unknown(industry_subject(industry), Some(custom.id.clone())));
                }
                let Some(slot) = &custom.slot else { continue };
                let Some(family) = view.family_of(industry) else { continue };
                if family.slot_position(slot).is_none() {
                    violations.push(CatalogViolation {
                        rule: self.name().to_string(),
                        severity: ViolationSeverity::Warning,
                        subject: industry_subject(industry),
                        message: format!("Slot not declared by family {}; section goes after Hero", family.id),
                        expected: None,
                        actual: Some(slot.clone()),
                        remediation: vec!["Declare the slot on a family entry or drop it".to_string()],
                    });
                }
            }
        }

        violations
    }
}

pub struct OverrideTargetRule;

impl CatalogRule for OverrideTargetRule {
    fn name(&self) -> &'static str { "override_target" }

    fn validate(&self, view: &CatalogView<'_>) -> Vec<CatalogViolation> {
        let mut violations = vec![];
        for industry in view.industries.list() {
            let Some(family) = view.family_of(industry) else { continue };
            for component in industry.section_overrides.keys() {
                if !family.has_component(*component) {
                    violations.push(CatalogViolation {
                        rule: self.name().to_string(),
                        severity: ViolationSeverity::Warning,
                        subject: industry_subject(industry),
                        message: format!("Override for {} never applies", component),
                        expected: Some(format!("a {} entry in family {}", component, family.id)),
                        actual: None,
                        remediation: vec!["Remove the override or add the section to the family".to_string()],
                    });
                }
            }
        }
        violations
    }
}

/// Validator orchestrates rules and applies policy
pub struct CatalogValidator {
    rules: Vec<Box<dyn CatalogRule>>,
}

impl CatalogValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(FamilyReferenceRule),
                Box::new(NonEmptyRule),
                Box::new(VariantNameRule),
                Box::new(CustomBlockRule),
                Box::new(OverrideTargetRule),
            ],
        }
    }

    pub fn validate(&self, industries: &IndustryCatalog, families: &TemplateFamilyRegistry) -> ValidationResult {
        let view = CatalogView { industries, families };

        let mut violations = vec![];
        for rule in &self.rules {
            violations.extend(rule.validate(&view));
        }

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult {
            valid,
            violations,
            industries_checked: industries.list().len(),
            families_checked: families.list().len(),
        }
    }
}

impl Default for CatalogValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::SectionBlueprint;
    use crate::industries::{CustomSection, SectionOverride};
    use crate::test_support::{family, industry};

    fn registry(f: TemplateFamily) -> TemplateFamilyRegistry {
        let mut r = TemplateFamilyRegistry::new();
        r.register(f);
        r
    }

    fn catalog_of(i: IndustryProfile) -> IndustryCatalog {
        let mut c = IndustryCatalog::new();
        c.register(i);
        c
    }

    #[test]
    fn test_clean_catalog_passes() {
        let result = CatalogValidator::new().validate(&catalog_of(industry("law")), &registry(family()));
        assert!(result.valid);
        assert!(result.violations.is_empty());
        assert_eq!(result.industries_checked, 1);
    }

    #[test]
    fn test_unknown_family_is_error() {
        let mut i = industry("law");
        i.template_family = Some("luxuryBoutique".to_string());
        let result = CatalogValidator::new().validate(&catalog_of(i), &registry(family()));
        assert!(!result.valid);
        assert_eq!(result.errors().next().unwrap().rule, "family_reference");
    }

    #[test]
    fn test_unknown_variant_fails_loudly() {
        let mut f = family();
        f.sections[1] = SectionBlueprint::new(SectionComponent::Services).with_variant("editorial");
        let result = CatalogValidator::new().validate(&catalog_of(industry("law")), &registry(f));
        assert!(!result.valid);
        let v = result.errors().next().unwrap();
        assert_eq!(v.rule, "variant_name");
        assert_eq!(v.actual.as_deref(), Some("editorial"));
    }

    #[test]
    fn test_override_variant_checked_against_its_component() {
        let mut i = industry("law");
        i.section_overrides.insert(
            SectionComponent::Footer,
            SectionOverride { variant: Some("carousel".to_string()), ..Default::default() },
        );
        let result = CatalogValidator::new().validate(&catalog_of(i), &registry(family()));
        assert!(result.has_errors());
    }

    #[test]
    fn test_undeclared_slot_only_warns() {
        let mut i = industry("law");
        i.custom_sections.push(CustomSection {
            id: "faq".to_string(),
            slot: Some("afterPricing".to_string()),
            variant: None,
            props: Default::default(),
        });
        let result = CatalogValidator::new().validate(&catalog_of(i), &registry(family()));
        assert!(result.valid);
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_unknown_custom_block_is_error() {
        let mut i = industry("law");
        i.custom_sections.push(CustomSection {
            id: "pricing-table".to_string(),
            slot: None,
            variant: None,
            props: Default::default(),
        });
        let result = CatalogValidator::new().validate(&catalog_of(i), &registry(family()));
        assert!(!result.valid);
    }
}
