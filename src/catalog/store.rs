//! Reloadable catalog handle.
//!
//! Readers take an `Arc<Catalog>` snapshot and keep it for the whole operation.
//! A reload builds the new catalog completely before swapping the single
//! shared reference, so a reader sees either the old or the new catalog.

use super::document::CatalogDocument;
use super::source::{CatalogSource, ChangeMarker, InlineSource};
use super::Catalog;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct RefreshState {
    marker: Option<ChangeMarker>,
    expires_at: Option<Instant>,
}

#[derive(Debug)]
pub struct CatalogStore {
    source: Box<dyn CatalogSource>,
    ttl: Option<Duration>,
    current: RwLock<Arc<Catalog>>,
    refresh: Mutex<RefreshState>,
}

impl CatalogStore {
    /// Create a store and perform the initial load.
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self::with_ttl(source, None)
    }

    /// Like [`CatalogStore::new`], but also reload once `ttl` has elapsed even
    /// when the change marker is unchanged.
    pub fn with_ttl(source: impl CatalogSource + 'static, ttl: Option<Duration>) -> Self {
        Self::from_boxed(Box::new(source), ttl)
    }

    /// Store over a source chosen at runtime.
    pub fn from_boxed(source: Box<dyn CatalogSource>, ttl: Option<Duration>) -> Self {
        let store = CatalogStore {
            source,
            ttl,
            current: RwLock::new(Arc::new(Catalog::empty())),
            refresh: Mutex::new(RefreshState::default()),
        };
        store.refresh();
        store
    }

    /// Store backed by an in-memory document.
    pub fn from_document(document: CatalogDocument) -> Self {
        Self::new(InlineSource::new(document))
    }

    /// Current catalog.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().clone()
    }

    /// Reload if the source changed or the cache expired. Returns whether a
    /// reload happened. Cheap when nothing changed.
    pub fn refresh(&self) -> bool {
        let mut state = self.refresh.lock();
        let marker = self.source.marker();
        let expired = state.expires_at.is_some_and(|at| Instant::now() >= at);

        if state.marker == Some(marker) && !expired {
            return false;
        }

        let catalog = match self.source.load() {
            Ok(document) => Catalog::from_document(document),
            Err(err) => {
                tracing::warn!(source = %self.source.describe(), error = %err, "catalog unavailable, using empty catalog");
                Catalog::empty()
            }
        };

        tracing::info!(
            source = %self.source.describe(),
            categories = catalog.categories().len(),
            items = catalog.items().len(),
            "catalog loaded"
        );

        *self.current.write() = Arc::new(catalog);
        state.marker = Some(marker);
        state.expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        true
    }

    /// Reload unconditionally.
    pub fn force_reload(&self) {
        self.refresh.lock().marker = None;
        self.refresh();
    }

    pub fn source(&self) -> &dyn CatalogSource {
        self.source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogError;
    use crate::catalog::source::{FileSource, UrlSource};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const MENU: &str = r#"{"menu_categories": {"grill": {"name": "Grill", "items": [
        {"name": "Pork BBQ", "variations": [{"name": "Regular", "price": 45}]}]}}}"#;

    #[derive(Debug, Default)]
    struct CountingSource {
        loads: AtomicUsize,
    }

    impl CatalogSource for CountingSource {
        fn describe(&self) -> String {
            "counting".into()
        }

        fn marker(&self) -> ChangeMarker {
            ChangeMarker::Revision(7)
        }

        fn load(&self) -> Result<CatalogDocument, crate::CatalogError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(CatalogDocument::from_json(MENU)?)
        }
    }

    #[test]
    fn refresh_skips_reparse_when_marker_unchanged() {
        let store = CatalogStore::new(CountingSource::default());
        assert!(!store.refresh());
        assert!(!store.refresh());
        assert_eq!(store.snapshot().items().len(), 1);
    }

    #[test]
    fn expired_ttl_forces_reload() {
        let store = CatalogStore::with_ttl(CountingSource::default(), Some(Duration::ZERO));
        assert!(store.refresh());
    }

    #[test]
    fn malformed_file_yields_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = CatalogStore::new(FileSource::new(&path));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn missing_file_yields_empty_catalog_then_loads_when_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");

        let store = CatalogStore::new(FileSource::new(&path));
        assert!(store.snapshot().is_empty());

        std::fs::write(&path, MENU).unwrap();
        assert!(store.refresh());
        assert_eq!(store.snapshot().items()[0].name, "Pork BBQ");
    }

    #[test]
    fn old_snapshot_survives_swap() {
        let source = InlineSource::from_json(MENU).unwrap();
        let store = CatalogStore::new(source);
        let before = store.snapshot();

        store.force_reload();
        let after = store.snapshot();

        assert_eq!(before.items().len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn unreachable_url_yields_empty_catalog_until_reload_succeeds() {
        let up = Arc::new(AtomicBool::new(false));
        let reachable = Arc::clone(&up);
        let source = UrlSource::with_fetch("https://menu.example/menu.json", None, move |url: &str| {
            if reachable.load(Ordering::SeqCst) {
                Ok(MENU.to_string())
            } else {
                Err(CatalogError::Fetch { url: url.to_string(), message: "connection refused".into() })
            }
        });

        let store = CatalogStore::new(source);
        assert!(store.snapshot().is_empty());
        assert!(!store.refresh());

        up.store(true, Ordering::SeqCst);
        store.force_reload();
        assert_eq!(store.snapshot().items()[0].name, "Pork BBQ");
    }
}
