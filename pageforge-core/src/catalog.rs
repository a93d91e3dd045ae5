//! Catalog - the read-only bundle of industries, families and theme data
//!
//! Built once at startup and handed to the resolver, builder and preview
//! route. Construction always runs the full validation pass; an invalid
//! catalog never exists at runtime.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::families::{TemplateFamily, TemplateFamilyRegistry};
use crate::industries::{IndustryCatalog, IndustryProfile};
use crate::theme::{ColorScheme, FontCombo, ThemeCatalog};
use crate::validation::{CatalogValidator, ValidationResult};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid version string: {0}")]
    BadVersion(String),

    #[error("Catalog failed validation: {}", summarize(.0))]
    Invalid(ValidationResult),
}

fn summarize(result: &ValidationResult) -> String {
    result
        .errors()
        .map(|v| format!("{} [{}]: {}", v.subject, v.rule, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogManifest {
    pub version: String,
    pub engine_min_version: String,
    #[serde(default)]
    pub fonts: Vec<FontCombo>,
    #[serde(default)]
    pub colors: Vec<ColorScheme>,
}

impl Default for CatalogManifest {
    fn default() -> Self {
        Self {
            version: "0.0.0".to_string(),
            engine_min_version: crate::MIN_ENGINE_VERSION.to_string(),
            fonts: vec![],
            colors: vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub manifest: CatalogManifest,
    pub industries: IndustryCatalog,
    pub families: TemplateFamilyRegistry,
    pub themes: ThemeCatalog,
    pub validation: ValidationResult,
}

impl Catalog {
    /// Assemble and validate a catalog.
    pub fn new(
        manifest: CatalogManifest,
        industries: IndustryCatalog,
        families: TemplateFamilyRegistry,
    ) -> Result<Self, CatalogError> {
        check_engine_version(&manifest)?;

        let mut themes = ThemeCatalog::new();
        for combo in &manifest.fonts {
            themes.register_fonts(combo.clone());
        }
        for scheme in &manifest.colors {
            themes.register_colors(scheme.clone());
        }

        let validation = CatalogValidator::new().validate(&industries, &families);
        for warning in validation.warnings() {
            tracing::warn!(rule = %warning.rule, subject = %warning.subject, "{}", warning.message);
        }
        if !validation.valid {
            return Err(CatalogError::Invalid(validation));
        }

        tracing::info!(
            version = %manifest.version,
            industries = industries.list().len(),
            families = families.list().len(),
            "Catalog loaded"
        );

        Ok(Self { manifest, industries, families, themes, validation })
    }

    /// Load `catalog.json`, `families/*.json` and `industries/*.json` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CatalogError> {
        let manifest_path = dir.join("catalog.json");
        let manifest = if manifest_path.exists() {
            read_json(&manifest_path)?
        } else {
            CatalogManifest::default()
        };
        let families = TemplateFamilyRegistry::load_from_dir(&dir.join("families"))?;
        let industries = IndustryCatalog::load_from_dir(&dir.join("industries"))?;
        Self::new(manifest, industries, families)
    }

    /// The catalog shipped inside the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let manifest: CatalogManifest = parse_embedded("catalog.json", builtin::MANIFEST)?;

        let mut families = TemplateFamilyRegistry::new();
        for (name, source) in builtin::FAMILIES {
            families.register(parse_embedded::<TemplateFamily>(name, source)?);
        }

        let mut industries = IndustryCatalog::new();
        for (name, source) in builtin::INDUSTRIES {
            industries.register(parse_embedded::<IndustryProfile>(name, source)?);
        }

        Self::new(manifest, industries, families)
    }

    pub fn industry(&self, id: &str) -> Option<&IndustryProfile> {
        self.industries.get(id)
    }

    pub fn family(&self, id: &str) -> Option<&TemplateFamily> {
        self.families.get(id)
    }
}

fn check_engine_version(manifest: &CatalogManifest) -> Result<(), CatalogError> {
    let engine_ver = semver::Version::parse(ENGINE_VERSION)
        .map_err(|_| CatalogError::BadVersion(ENGINE_VERSION.to_string()))?;
    let min_ver = semver::Version::parse(&manifest.engine_min_version)
        .map_err(|_| CatalogError::BadVersion(manifest.engine_min_version.clone()))?;

    if engine_ver < min_ver {
        return Err(CatalogError::EngineVersionMismatch(
            manifest.version.clone(),
            manifest.engine_min_version.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_embedded<T: DeserializeOwned>(name: &str, source: &str) -> Result<T, CatalogError> {
    serde_json::from_str(source).map_err(|source| CatalogError::Parse {
        path: PathBuf::from(name),
        source,
    })
}

/// Parse every `*.json` file in `dir`, sorted by file name.
///
/// A missing directory yields nothing; an unreadable or malformed file is
/// an error rather than being skipped.
pub(crate) fn read_json_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, CatalogError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let io_err = |source| CatalogError::Io { path: dir.to_path_buf(), source };

    let mut paths = vec![];
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().map_or(false, |e| e == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| read_json(p)).collect()
}

mod builtin {
    pub const MANIFEST: &str = include_str!("../catalog/catalog.json");

    pub const FAMILIES: &[(&str, &str)] = &[
        ("families/professionalServices.json", include_str!("../catalog/families/professionalServices.json")),
        ("families/healthcare.json", include_str!("../catalog/families/healthcare.json")),
        ("families/localTrades.json", include_str!("../catalog/families/localTrades.json")),
    ];

    pub const INDUSTRIES: &[(&str, &str)] = &[
        ("industries/accounting.json", include_str!("../catalog/industries/accounting.json")),
        ("industries/law.json", include_str!("../catalog/industries/law.json")),
        ("industries/healthcare.json", include_str!("../catalog/industries/healthcare.json")),
        ("industries/real-estate.json", include_str!("../catalog/industries/real-estate.json")),
        ("industries/construction.json", include_str!("../catalog/industries/construction.json")),
        ("industries/fitness.json", include_str!("../catalog/industries/fitness.json")),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.validation.valid);
        assert!(catalog.industry("law").is_some());
        assert!(catalog.family(crate::families::DEFAULT_FAMILY).is_some());
    }

    #[test]
    fn test_load_from_dir_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("families")).unwrap();
        fs::write(dir.path().join("families/broken.json"), "{ not json").unwrap();

        let err = Catalog::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_engine_version_gate() {
        let manifest = CatalogManifest {
            engine_min_version: "99.0.0".to_string(),
            ..CatalogManifest::default()
        };
        let err = Catalog::new(manifest, IndustryCatalog::new(), TemplateFamilyRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("requires engine"));
    }
}
