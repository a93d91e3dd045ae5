//! Preview frame seams
//!
//! The export pipeline never touches a concrete document. It talks to a
//! [`PreviewFrame`] that hands out a [`FrameDocument`], and falls back to a
//! [`PreviewFetcher`] when that fails.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use url::Url;

use crate::builder::BuilderState;
use crate::config::PipelineConfig;
use crate::export::ExportError;
use crate::preview::{page_context, PreviewError};
use crate::render::Renderer;

/// An isolated frame holding the rendered preview.
#[async_trait]
pub trait PreviewFrame: Send + Sync {
    /// The frame's document, or `ExportError::FrameAccess` when it cannot be reached.
    async fn document(&self) -> Result<Arc<dyn FrameDocument>, ExportError>;
}

#[async_trait]
pub trait FrameDocument: Send + Sync {
    fn viewport_height(&self) -> u32;

    /// Current document height; may grow as lazy content appears.
    fn scroll_height(&self) -> u32;

    async fn scroll_to(&self, y: u32);

    fn images(&self) -> Vec<Arc<dyn FrameImage>>;

    /// Outer markup of the root element, without a doctype.
    fn outer_html(&self) -> Result<String, ExportError>;
}

#[async_trait]
pub trait FrameImage: Send + Sync {
    fn src(&self) -> &str;

    fn is_complete(&self) -> bool;

    /// Resolves once the image has loaded or failed. May never resolve.
    async fn settled(&self);
}

/// Plain network fetch of the preview route, used by the fallback path.
#[async_trait]
pub trait PreviewFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, ExportError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl PreviewFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ExportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ExportError::Fetch(e.to_string()))?;
        response.text().await.map_err(|e| ExportError::Fetch(e.to_string()))
    }
}

/// An image whose load is probed over HTTP.
pub struct HttpImage {
    src: String,
    url: Option<Url>,
    client: reqwest::Client,
    complete: AtomicBool,
}

impl HttpImage {
    /// Relative sources are resolved against `base`; anything that is not
    /// http(s) afterwards (data URIs, unresolvable paths) counts as loaded.
    pub fn new(src: &str, base: Option<&Url>, client: reqwest::Client) -> Self {
        let url = Url::parse(src)
            .or_else(|e| base.map_or(Err(e), |b| b.join(src)))
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"));
        Self {
            src: src.to_string(),
            complete: AtomicBool::new(url.is_none()),
            url,
            client,
        }
    }
}

#[async_trait]
impl FrameImage for HttpImage {
    fn src(&self) -> &str {
        &self.src
    }

    fn is_complete(&self) -> bool {
        self.complete.load(Ordering::SeqCst)
    }

    async fn settled(&self) {
        if let Some(url) = &self.url {
            // A failed load settles the image just like a successful one.
            if let Err(e) = self.client.get(url.clone()).send().await {
                tracing::debug!(src = %self.src, error = %e, "Image failed to load");
            }
        }
        self.complete.store(true, Ordering::SeqCst);
    }
}

/// Server-rendered markup standing in for a browser frame.
///
/// Each section is treated as one viewport tall for the scroll-through.
pub struct RenderedDocument {
    root: String,
    viewport_height: u32,
    scroll_height: u32,
    scroll_y: AtomicU32,
    images: Vec<Arc<dyn FrameImage>>,
}

impl RenderedDocument {
    pub fn scroll_y(&self) -> u32 {
        self.scroll_y.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameDocument for RenderedDocument {
    fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    fn scroll_height(&self) -> u32 {
        self.scroll_height
    }

    async fn scroll_to(&self, y: u32) {
        self.scroll_y.store(y.min(self.scroll_height), Ordering::SeqCst);
    }

    fn images(&self) -> Vec<Arc<dyn FrameImage>> {
        self.images.clone()
    }

    fn outer_html(&self) -> Result<String, ExportError> {
        Ok(self.root.clone())
    }
}

pub struct RenderedFrame {
    document: Arc<RenderedDocument>,
}

impl RenderedFrame {
    /// Render the builder's current draft in-process.
    pub fn from_state(
        state: &BuilderState,
        renderer: &Renderer,
        config: &PipelineConfig,
        client: reqwest::Client,
        asset_base: Option<&Url>,
    ) -> Result<Self, PreviewError> {
        let page = page_context(state.catalog(), &state.preview_query())?;
        let root = renderer.render_root(&page)?;
        let images = page
            .image_sources()
            .iter()
            .map(|src| Arc::new(HttpImage::new(src, asset_base, client.clone())) as Arc<dyn FrameImage>)
            .collect();
        let viewport_height = config.viewport_height;
        let sections = page.sections.len().max(1) as u32;

        Ok(Self {
            document: Arc::new(RenderedDocument {
                root,
                viewport_height,
                scroll_height: viewport_height.saturating_mul(sections),
                scroll_y: AtomicU32::new(0),
                images,
            }),
        })
    }

    pub fn document_handle(&self) -> &RenderedDocument {
        &self.document
    }
}

#[async_trait]
impl PreviewFrame for RenderedFrame {
    async fn document(&self) -> Result<Arc<dyn FrameDocument>, ExportError> {
        let document: Arc<dyn FrameDocument> = self.document.clone();
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_non_http_images_start_complete() {
        let client = reqwest::Client::new();
        assert!(HttpImage::new("data:image/png;base64,AAAA", None, client.clone()).is_complete());
        assert!(HttpImage::new("/img/law.jpg", None, client.clone()).is_complete());

        let base = Url::parse("http://127.0.0.1:4000/").unwrap();
        let relative = HttpImage::new("/img/law.jpg", Some(&base), client.clone());
        assert!(!relative.is_complete());
        assert_eq!(relative.src(), "/img/law.jpg");
    }

    #[tokio::test]
    async fn test_rendered_frame_from_builder_state() {
        let state = BuilderState::new(Arc::new(Catalog::builtin().unwrap()), "law").unwrap();
        let renderer = Renderer::new().unwrap();
        let config = PipelineConfig::default();
        let frame = RenderedFrame::from_state(&state, &renderer, &config, reqwest::Client::new(), None).unwrap();

        let doc = frame.document().await.unwrap();
        assert!(doc.outer_html().unwrap().starts_with("<html"));
        assert_eq!(doc.scroll_height(), 900 * state.sections().len() as u32);

        // Only the hero background; unresolvable without a base, so already complete.
        let images = doc.images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].src(), "/images/law/library.jpg");
        assert!(images[0].is_complete());

        doc.scroll_to(u32::MAX).await;
        assert_eq!(frame.document_handle().scroll_y(), doc.scroll_height());
    }
}
