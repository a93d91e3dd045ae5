//! Font and color catalogs.
//!
//! Both catalogs treat the id `"default"` as "use the industry's own values".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::industries::{FontPairing, IndustryProfile, Palette, ThemeMode};

pub const DEFAULT_ID: &str = "default";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown font combination: {0}")]
    UnknownFontCombo(String),

    #[error("Unknown color scheme: {0}")]
    UnknownColorScheme(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontCombo {
    pub id: String,
    pub name: String,
    pub fonts: FontPairing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    pub id: String,
    pub name: String,
    pub colors: Palette,
}

/// Colors derived from the palette and theme mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceColors {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_muted: String,
}

impl SurfaceColors {
    pub fn derive(palette: &Palette, mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: "#ffffff".to_string(),
                surface: "#f8fafc".to_string(),
                text: "#0f172a".to_string(),
                text_muted: "#475569".to_string(),
            },
            ThemeMode::Dark => Self {
                background: palette.primary_dark.clone(),
                surface: "#111827".to_string(),
                text: "#f8fafc".to_string(),
                text_muted: "#cbd5e1".to_string(),
            },
        }
    }
}

fn system_fonts() -> FontPairing {
    FontPairing {
        heading: "system-ui".to_string(),
        body: "system-ui".to_string(),
        resource_url: None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    fonts: BTreeMap<String, FontCombo>,
    colors: BTreeMap<String, ColorScheme>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_fonts(&mut self, combo: FontCombo) {
        self.fonts.insert(combo.id.clone(), combo);
    }

    pub fn register_colors(&mut self, scheme: ColorScheme) {
        self.colors.insert(scheme.id.clone(), scheme);
    }

    pub fn resolve_fonts(&self, id: &str, industry: &IndustryProfile) -> Result<FontPairing, ThemeError> {
        if id == DEFAULT_ID {
            return Ok(industry.fonts.clone().unwrap_or_else(system_fonts));
        }
        self.fonts
            .get(id)
            .map(|c| c.fonts.clone())
            .ok_or_else(|| ThemeError::UnknownFontCombo(id.to_string()))
    }

    pub fn resolve_colors(&self, id: &str, industry: &IndustryProfile) -> Result<Palette, ThemeError> {
        if id == DEFAULT_ID {
            return Ok(industry.colors.clone());
        }
        self.colors
            .get(id)
            .map(|s| s.colors.clone())
            .ok_or_else(|| ThemeError::UnknownColorScheme(id.to_string()))
    }

    pub fn has_fonts(&self, id: &str) -> bool {
        id == DEFAULT_ID || self.fonts.contains_key(id)
    }

    pub fn has_colors(&self, id: &str) -> bool {
        id == DEFAULT_ID || self.colors.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(primary: &str) -> Palette {
        Palette {
            primary: primary.to_string(),
            primary_light: "#eee".to_string(),
            primary_dark: "#111".to_string(),
            accent: "#f00".to_string(),
        }
    }

    #[test]
    fn test_dark_mode_uses_primary_dark_background() {
        let p = palette("#123456");
        let light = SurfaceColors::derive(&p, ThemeMode::Light);
        let dark = SurfaceColors::derive(&p, ThemeMode::Dark);
        assert_eq!(light.background, "#ffffff");
        assert_eq!(dark.background, "#111");
        assert_ne!(light.text, dark.text);
    }

    #[test]
    fn test_catalog_membership() {
        let mut catalog = ThemeCatalog::new();
        catalog.register_colors(ColorScheme {
            id: "ocean".to_string(),
            name: "Ocean".to_string(),
            colors: palette("#0077be"),
        });
        assert!(catalog.has_colors("ocean"));
        assert!(catalog.has_colors(DEFAULT_ID));
        assert!(!catalog.has_fonts("serif-classic"));
    }
}
