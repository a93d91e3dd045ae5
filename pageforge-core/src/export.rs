//! Export Pipeline - Single Entry Point
//!
//! Capture order is fixed: hide chrome, reach the document, scroll
//! through, wait for images, settle, serialize. Any failure before the
//! markup is in hand switches to exactly one direct fetch of the preview
//! URL. Chrome and the exporting flag are restored on every path.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::builder::BuilderState;
use crate::config::PipelineConfig;
use crate::frame::{FrameDocument, FrameImage, PreviewFetcher, PreviewFrame};
use crate::hashing::sha256_hex;
use crate::preview::PreviewError;
use crate::render::DOCTYPE;
use crate::resolver::{fingerprint, BlueprintResolver, ResolveError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Frame document is not accessible: {0}")]
    FrameAccess(String),

    #[error("Failed to serialize frame document: {0}")]
    Serialize(String),

    #[error("Preview fetch failed: {0}")]
    Fetch(String),

    #[error("Export failed ({primary}); fallback fetch failed: {fallback}")]
    FallbackFailed { primary: String, fallback: String },

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Hashing error: {0}")]
    Hash(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportSource {
    /// Captured from the live frame after settling.
    Frame,
    /// Fetched directly; lazy content may not have rendered.
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub id: String,
    pub industry: String,
    pub filename: String,
    pub source: ExportSource,
    pub exported_at: DateTime<Utc>,
    pub sha256: String,
    pub blueprint_fingerprint: String,
    #[serde(skip)]
    pub html: String,
}

impl ExportArtifact {
    /// Write the file into `dir`. The content lands under a temporary name
    /// first, so an interrupted write never leaves a truncated export.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let target = dir.join(&self.filename);
        let partial = dir.join(format!(".{}.part", self.filename));
        fs::write(&partial, self.html.as_bytes())?;
        fs::rename(&partial, &target)?;
        Ok(target)
    }
}

/// Outcome of the image-settle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub waited: usize,
    pub timed_out: usize,
}

/// Wait for every incomplete image at once, each bounded by `timeout`.
///
/// Completes when the slowest image loads or times out; a timeout is not
/// an error.
pub async fn settle_images(images: Vec<Arc<dyn FrameImage>>, timeout: Duration) -> SettleReport {
    let pending: Vec<_> = images.into_iter().filter(|i| !i.is_complete()).collect();
    let results = join_all(pending.iter().map(|img| tokio::time::timeout(timeout, img.settled()))).await;

    let timed_out = results.iter().filter(|r| r.is_err()).count();
    for (img, result) in pending.iter().zip(&results) {
        if result.is_err() {
            tracing::debug!(src = %img.src(), "Image did not settle before timeout");
        }
    }
    SettleReport { waited: pending.len(), timed_out }
}

/// Hides chrome and marks the builder as exporting until dropped.
struct CaptureGuard<'a> {
    state: &'a mut BuilderState,
}

impl<'a> CaptureGuard<'a> {
    fn new(state: &'a mut BuilderState) -> Self {
        state.set_capturing(true);
        Self { state }
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.state.set_capturing(false);
    }
}

pub struct ExportPipeline {
    config: PipelineConfig,
    fetcher: Box<dyn PreviewFetcher>,
}

impl ExportPipeline {
    pub fn new(config: PipelineConfig, fetcher: Box<dyn PreviewFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Export the builder's current page.
    ///
    /// Builder state is only touched through the capture guard; on a
    /// `FallbackFailed` error no artifact exists and the draft is intact.
    pub async fn export(
        &self,
        state: &mut BuilderState,
        frame: &dyn PreviewFrame,
        preview_base: &Url,
    ) -> Result<ExportArtifact, ExportError> {
        let preview_url = state.preview_url(preview_base)?;
        let industry = state.industry_id().to_string();
        let filename = state.export_filename();
        let resolved = BlueprintResolver::new(state.catalog()).resolve_entries(&industry, state.sections())?;
        let blueprint_fingerprint = fingerprint(&resolved)?;
        let export_id = Uuid::new_v4().to_string();

        let _guard = CaptureGuard::new(state);
        tracing::info!(export_id = %export_id, industry = %industry, "Export started");

        let (html, source) = match self.capture(frame).await {
            Ok(html) => (html, ExportSource::Frame),
            Err(primary) => {
                tracing::warn!(
                    export_id = %export_id,
                    error = %primary,
                    url = %preview_url,
                    "Frame capture failed, fetching preview directly"
                );
                match self.fetcher.fetch(&preview_url).await {
                    Ok(html) => (html, ExportSource::Fallback),
                    Err(fallback) => {
                        tracing::error!(export_id = %export_id, error = %fallback, "Fallback export failed");
                        return Err(ExportError::FallbackFailed {
                            primary: primary.to_string(),
                            fallback: fallback.to_string(),
                        });
                    }
                }
            }
        };

        let artifact = ExportArtifact {
            id: export_id,
            industry,
            filename,
            source,
            exported_at: Utc::now(),
            sha256: sha256_hex(html.as_bytes()),
            blueprint_fingerprint,
            html,
        };
        tracing::info!(
            export_id = %artifact.id,
            source = ?artifact.source,
            bytes = artifact.html.len(),
            "Export finished"
        );
        Ok(artifact)
    }

    async fn capture(&self, frame: &dyn PreviewFrame) -> Result<String, ExportError> {
        let document = frame.document().await?;

        self.scroll_through(document.as_ref()).await;

        let report = settle_images(document.images(), self.config.image_timeout()).await;
        if report.timed_out > 0 {
            tracing::warn!(
                waited = report.waited,
                timed_out = report.timed_out,
                "Some images never settled, continuing"
            );
        }

        tokio::time::sleep(self.config.final_settle()).await;

        let root = document.outer_html()?;
        Ok(format!("{}\n{}", DOCTYPE, root))
    }

    /// Step down the page so lazy content triggers, then return to the top.
    async fn scroll_through(&self, document: &dyn FrameDocument) {
        let viewport = document.viewport_height();
        let step = self.config.scroll_step(viewport);
        let mut ticker = tokio::time::interval(self.config.scroll_interval());
        let mut y = 0u32;

        for _ in 0..self.config.max_scroll_steps {
            ticker.tick().await;
            document.scroll_to(y).await;
            let bottom = document.scroll_height().saturating_sub(viewport);
            if y >= bottom {
                break;
            }
            y = y.saturating_add(step).min(bottom);
        }

        document.scroll_to(0).await;
        tokio::time::sleep(self.config.scroll_settle()).await;
    }
}
