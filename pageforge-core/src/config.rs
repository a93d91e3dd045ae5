//! Export pipeline timing.
//!
//! The settle strategy is best effort: these delays guess at lazy-load and
//! animation timing, so they are data rather than constants.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Fraction of the viewport height scrolled per step.
    #[serde(default = "default_scroll_step_ratio")]
    pub scroll_step_ratio: f64,
    #[serde(default = "default_scroll_interval_ms")]
    pub scroll_interval_ms: u64,
    /// Stop scrolling after this many steps even if the page keeps growing.
    #[serde(default = "default_max_scroll_steps")]
    pub max_scroll_steps: u32,
    /// Wait after returning to the top of the page.
    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,
    /// Upper bound on waiting for any single image.
    #[serde(default = "default_image_timeout_ms")]
    pub image_timeout_ms: u64,
    #[serde(default = "default_final_settle_ms")]
    pub final_settle_ms: u64,
    /// Viewport height assumed by in-process frames.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

fn default_scroll_step_ratio() -> f64 { 0.8 }
fn default_scroll_interval_ms() -> u64 { 150 }
fn default_max_scroll_steps() -> u32 { 200 }
fn default_scroll_settle_ms() -> u64 { 500 }
fn default_image_timeout_ms() -> u64 { 3000 }
fn default_final_settle_ms() -> u64 { 300 }
fn default_viewport_height() -> u32 { 900 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scroll_step_ratio: default_scroll_step_ratio(),
            scroll_interval_ms: default_scroll_interval_ms(),
            max_scroll_steps: default_max_scroll_steps(),
            scroll_settle_ms: default_scroll_settle_ms(),
            image_timeout_ms: default_image_timeout_ms(),
            final_settle_ms: default_final_settle_ms(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, std::io::Error> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Pixels per scroll step for a viewport; never zero.
    pub fn scroll_step(&self, viewport_height: u32) -> u32 {
        ((viewport_height as f64 * self.scroll_step_ratio) as u32).max(1)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    pub fn final_settle(&self) -> Duration {
        Duration::from_millis(self.final_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        fs::write(&path, r#"{"imageTimeoutMs": 1000}"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.image_timeout(), Duration::from_secs(1));
        assert_eq!(config.scroll_interval_ms, 150);
        assert_eq!(config.final_settle_ms, 300);
    }

    #[test]
    fn test_scroll_step_is_eighty_percent() {
        let config = PipelineConfig::default();
        assert_eq!(config.scroll_step(1000), 800);
        assert_eq!(config.scroll_step(0), 1);
    }
}
