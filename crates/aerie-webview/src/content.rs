//! Per-surface page content and the shared content store.
//!
//! Generated HTML documents are too large to hand to the engine inline, so
//! they are parked in the store under the surface's stable id and loaded
//! through a synthetic page-data URL served by the host's media server.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use url::Url;

use aerie_common::SurfaceId;

/// Path prefix for bundled content pages served by the host.
pub const PAGES_PREFIX: &str = "_aerie/pages";

/// Endpoint serving per-surface generated HTML out of the content store.
pub const PAGE_DATA_PATH: &str = "/_aerie/legacyPageData";

/// Build the synthetic URL addressing a surface's page blob.
pub fn page_data_url(base: &Url, id: &SurfaceId) -> String {
    format!(
        "{}{}?id={}",
        base.as_str().trim_end_matches('/'),
        PAGE_DATA_PATH,
        id
    )
}

/// URL for a bundled asset. Paths without a leading slash live under the
/// host's own asset subpath.
pub fn asset_url(base: &Url, path: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/_aerie/{path}")
    }
}

/// Byte store for generated page documents, keyed by surface id.
///
/// Each blob is exclusively owned by its surface and removed exactly once
/// at teardown so recreated surfaces do not leak entries.
#[derive(Default)]
pub struct ContentStore {
    pages: Mutex<HashMap<SurfaceId, Vec<u8>>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, id: SurfaceId, html: Vec<u8>) {
        self.pages.lock().unwrap().insert(id, html);
    }

    pub fn get(&self, id: &SurfaceId) -> Option<Vec<u8>> {
        self.pages.lock().unwrap().get(id).cloned()
    }

    /// Remove a surface's blob. Returns false if it was already gone.
    pub fn remove(&self, id: &SurfaceId) -> bool {
        self.pages.lock().unwrap().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.lock().unwrap().is_empty()
    }
}

/// Dynamically assembled content for a standard page.
///
/// Handed mutably to content-will-set hook subscribers before the document
/// is composed, so they can append their own markup and asset subpaths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// HTML body.
    pub body: String,
    /// Extra HTML head markup.
    pub head: String,
    /// Stylesheet subpaths, resolvable by the host's media server.
    pub css: Vec<String>,
    /// Script subpaths, resolvable by the host's media server.
    pub js: Vec<String>,
}

impl PageContent {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }
}

/// Compose a full HTML document from assembled page content.
pub fn build_document(title: &str, content: &PageContent, base: &Url) -> String {
    let css: String = content
        .css
        .iter()
        .map(|p| format!("<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">\n", asset_url(base, p)))
        .collect();
    let js: String = content
        .js
        .iter()
        .map(|p| format!("<script src=\"{}\"></script>\n", asset_url(base, p)))
        .collect();

    format!(
        "<!doctype html>\n<html>\n<head>\n    <title>{title}</title>\n{css}{js}{head}\n</head>\n\n<body>{body}</body>\n</html>",
        head = content.head,
        body = content.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:40000").unwrap()
    }

    // -----------------------------------------------------------------
    // Store
    // -----------------------------------------------------------------

    #[test]
    fn put_get_round_trip() {
        let store = ContentStore::new();
        let id = SurfaceId::new();
        store.put(id.clone(), b"<html>hi</html>".to_vec());
        assert_eq!(store.get(&id).unwrap(), b"<html>hi</html>");
    }

    #[test]
    fn put_replaces_previous_blob() {
        let store = ContentStore::new();
        let id = SurfaceId::new();
        store.put(id.clone(), b"old".to_vec());
        store.put(id.clone(), b"new".to_vec());
        assert_eq!(store.get(&id).unwrap(), b"new");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_is_effective_exactly_once() {
        let store = ContentStore::new();
        let id = SurfaceId::new();
        store.put(id.clone(), b"page".to_vec());
        assert!(store.remove(&id));
        assert!(!store.remove(&id), "second remove must be a no-op");
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn surfaces_do_not_share_blobs() {
        let store = ContentStore::new();
        let a = SurfaceId::new();
        let b = SurfaceId::new();
        store.put(a.clone(), b"a".to_vec());
        store.put(b.clone(), b"b".to_vec());
        store.remove(&a);
        assert_eq!(store.get(&b).unwrap(), b"b");
    }

    // -----------------------------------------------------------------
    // URLs
    // -----------------------------------------------------------------

    #[test]
    fn page_data_url_format() {
        let id = SurfaceId::new();
        let url = page_data_url(&base(), &id);
        assert_eq!(
            url,
            format!("http://127.0.0.1:40000/_aerie/legacyPageData?id={id}")
        );
    }

    #[test]
    fn asset_url_bare_path_goes_under_host_subpath() {
        assert_eq!(
            asset_url(&base(), "css/webview.css"),
            "http://127.0.0.1:40000/_aerie/css/webview.css"
        );
    }

    #[test]
    fn asset_url_absolute_path_kept_verbatim() {
        assert_eq!(
            asset_url(&base(), "/_addons/demo/web/demo.js"),
            "http://127.0.0.1:40000/_addons/demo/web/demo.js"
        );
    }

    // -----------------------------------------------------------------
    // Document composition
    // -----------------------------------------------------------------

    #[test]
    fn build_document_includes_assets_and_body() {
        let content = PageContent {
            body: "<h1>deck</h1>".into(),
            head: "<meta charset=\"utf-8\">".into(),
            css: vec!["css/webview.css".into()],
            js: vec!["js/webview.js".into()],
        };
        let html = build_document("main", &content, &base());
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>main</title>"));
        assert!(html.contains("http://127.0.0.1:40000/_aerie/css/webview.css"));
        assert!(html.contains("http://127.0.0.1:40000/_aerie/js/webview.js"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<body><h1>deck</h1></body>"));
    }

    #[test]
    fn build_document_with_empty_content() {
        let html = build_document("empty", &PageContent::default(), &base());
        assert!(html.contains("<body></body>"));
    }
}
