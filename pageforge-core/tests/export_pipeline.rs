//! Export pipeline behavior against scripted frames.
//!
//! Time is paused so settle delays and image timeouts run instantly.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use pageforge_core::export::settle_images;
use pageforge_core::{
    BuilderState, Catalog, ExportError, ExportPipeline, ExportSource, FrameDocument, FrameImage,
    PipelineConfig, PreviewFetcher, PreviewFrame,
};

struct ScriptedImage {
    src: String,
    settles_after: Option<Duration>,
}

#[async_trait]
impl FrameImage for ScriptedImage {
    fn src(&self) -> &str {
        &self.src
    }

    fn is_complete(&self) -> bool {
        false
    }

    async fn settled(&self) {
        match self.settles_after {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending::<()>().await,
        }
    }
}

struct ScriptedDocument {
    scrolls: Mutex<Vec<u32>>,
    images: Vec<Arc<dyn FrameImage>>,
}

impl ScriptedDocument {
    fn new(images: Vec<Arc<dyn FrameImage>>) -> Arc<Self> {
        Arc::new(Self { scrolls: Mutex::new(vec![]), images })
    }
}

#[async_trait]
impl FrameDocument for ScriptedDocument {
    fn viewport_height(&self) -> u32 {
        1000
    }

    fn scroll_height(&self) -> u32 {
        3000
    }

    async fn scroll_to(&self, y: u32) {
        self.scrolls.lock().unwrap().push(y);
    }

    fn images(&self) -> Vec<Arc<dyn FrameImage>> {
        self.images.clone()
    }

    fn outer_html(&self) -> Result<String, ExportError> {
        Ok(r#"<html lang="en"><body><main>captured</main></body></html>"#.to_string())
    }
}

struct ScriptedFrame {
    document: Option<Arc<ScriptedDocument>>,
}

#[async_trait]
impl PreviewFrame for ScriptedFrame {
    async fn document(&self) -> Result<Arc<dyn FrameDocument>, ExportError> {
        match &self.document {
            Some(doc) => {
                let doc: Arc<dyn FrameDocument> = doc.clone();
                Ok(doc)
            }
            None => Err(ExportError::FrameAccess("cross-origin frame".to_string())),
        }
    }
}

struct CountingFetcher {
    calls: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<Url>>>,
    body: Option<String>,
}

#[async_trait]
impl PreviewFetcher for CountingFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());
        self.body
            .clone()
            .ok_or_else(|| ExportError::Fetch("connection refused".to_string()))
    }
}

struct Harness {
    state: BuilderState,
    pipeline: ExportPipeline,
    calls: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<Url>>>,
    base: Url,
}

fn harness(fallback_body: Option<&str>) -> Harness {
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let calls = Arc::new(AtomicUsize::new(0));
    let urls = Arc::new(Mutex::new(vec![]));
    let fetcher = CountingFetcher {
        calls: calls.clone(),
        urls: urls.clone(),
        body: fallback_body.map(str::to_string),
    };
    Harness {
        state: BuilderState::new(catalog, "law").unwrap(),
        pipeline: ExportPipeline::new(PipelineConfig::default(), Box::new(fetcher)),
        calls,
        urls,
        base: Url::parse("http://127.0.0.1:4000/").unwrap(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_frame_capture_is_primary() {
    let mut h = harness(Some("<html>fallback</html>"));
    let doc = ScriptedDocument::new(vec![]);
    let frame = ScriptedFrame { document: Some(doc.clone()) };

    let artifact = h.pipeline.export(&mut h.state, &frame, &h.base).await.unwrap();

    assert_eq!(artifact.source, ExportSource::Frame);
    assert!(artifact.html.starts_with("<!DOCTYPE html>"));
    assert!(artifact.html.contains("<main>captured</main>"));
    assert_eq!(artifact.filename, "law-landing-page.html");
    assert_eq!(artifact.industry, "law");
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);

    assert!(!h.state.is_exporting());
    assert!(!h.state.is_chrome_hidden());
}

#[tokio::test(start_paused = true)]
async fn test_scroll_through_returns_to_top() {
    let mut h = harness(None);
    let doc = ScriptedDocument::new(vec![]);
    let frame = ScriptedFrame { document: Some(doc.clone()) };

    h.pipeline.export(&mut h.state, &frame, &h.base).await.unwrap();

    let scrolls = doc.scrolls.lock().unwrap().clone();
    // 800px steps down to the 2000px bottom, then back to the top.
    assert_eq!(scrolls, vec![0, 800, 1600, 2000, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_frame_failure_falls_back_once() {
    let mut h = harness(Some("<!DOCTYPE html>\n<html>fallback</html>"));
    let frame = ScriptedFrame { document: None };

    let artifact = h.pipeline.export(&mut h.state, &frame, &h.base).await.unwrap();

    assert_eq!(artifact.source, ExportSource::Fallback);
    assert_eq!(artifact.html, "<!DOCTYPE html>\n<html>fallback</html>");
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);

    let urls = h.urls.lock().unwrap();
    assert_eq!(urls[0].path(), "/preview");
    assert!(urls[0].query_pairs().any(|(k, v)| k == "industry" && v == "law"));

    assert!(!h.state.is_exporting());
    assert!(!h.state.is_chrome_hidden());
}

#[tokio::test(start_paused = true)]
async fn test_fallback_failure_surfaces_and_restores_state() {
    let mut h = harness(None);
    let sections_before = h.state.sections().to_vec();
    let frame = ScriptedFrame { document: None };

    let err = h.pipeline.export(&mut h.state, &frame, &h.base).await.unwrap_err();

    match err {
        ExportError::FallbackFailed { primary, fallback } => {
            assert!(primary.contains("cross-origin"));
            assert!(fallback.contains("connection refused"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    assert!(!h.state.is_exporting());
    assert!(!h.state.is_chrome_hidden());
    assert_eq!(h.state.sections(), sections_before.as_slice());
}

#[tokio::test(start_paused = true)]
async fn test_stuck_image_does_not_block_export() {
    let mut h = harness(None);
    let stuck: Arc<dyn FrameImage> = Arc::new(ScriptedImage {
        src: "/images/never.jpg".to_string(),
        settles_after: None,
    });
    let doc = ScriptedDocument::new(vec![stuck]);
    let frame = ScriptedFrame { document: Some(doc) };

    let artifact = h.pipeline.export(&mut h.state, &frame, &h.base).await.unwrap();
    assert_eq!(artifact.source, ExportSource::Frame);
}

#[tokio::test(start_paused = true)]
async fn test_images_settle_concurrently_within_timeout() {
    let images: Vec<Arc<dyn FrameImage>> = vec![
        Arc::new(ScriptedImage { src: "a.jpg".to_string(), settles_after: Some(Duration::from_millis(200)) }),
        Arc::new(ScriptedImage { src: "b.jpg".to_string(), settles_after: Some(Duration::from_millis(900)) }),
        Arc::new(ScriptedImage { src: "c.jpg".to_string(), settles_after: None }),
    ];

    let start = tokio::time::Instant::now();
    let report = settle_images(images, Duration::from_millis(3000)).await;
    let elapsed = start.elapsed();

    assert_eq!(report.waited, 3);
    assert_eq!(report.timed_out, 1);
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(3100));
}

#[tokio::test(start_paused = true)]
async fn test_artifact_written_to_disk() {
    let mut h = harness(None);
    let frame = ScriptedFrame { document: Some(ScriptedDocument::new(vec![])) };
    let artifact = h.pipeline.export(&mut h.state, &frame, &h.base).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = artifact.write_to(dir.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), "law-landing-page.html");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), artifact.html);
    assert!(!dir.path().join(".law-landing-page.html.part").exists());
    assert_eq!(artifact.sha256.len(), 64);
}
