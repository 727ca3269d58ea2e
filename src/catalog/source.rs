//! Catalog sources.
//!
//! A source exposes a cheap change marker and an expensive `load`. The store
//! compares markers before every refresh and only reparses when they differ.
//!
//! ```text
//! FileSource    marker = mtime                 load = read + parse
//! UrlSource     marker = TTL epoch (elapsed/ttl) load = GET + parse
//! InlineSource  marker = revision counter       load = clone
//! ```

use super::document::CatalogDocument;
use crate::error::CatalogError;
use parking_lot::RwLock;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Identifies one version of a source's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeMarker {
    /// File modification time.
    Modified(SystemTime),
    /// Monotonic revision counter for in-memory sources.
    Revision(u64),
    /// Number of whole TTL periods since a remote source was created.
    Epoch(u64),
    /// The source does not exist (yet).
    Missing,
}

/// Where catalog documents come from.
pub trait CatalogSource: Send + Sync + fmt::Debug {
    /// Human readable origin, used in logs.
    fn describe(&self) -> String;

    /// Current change marker. Must not parse the document.
    fn marker(&self) -> ChangeMarker;

    /// Load and parse the full document.
    fn load(&self) -> Result<CatalogDocument, CatalogError>;
}

/// A JSON document on disk, polled by modification time.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn marker(&self) -> ChangeMarker {
        match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => ChangeMarker::Modified(modified),
            Err(_) => ChangeMarker::Missing,
        }
    }

    fn load(&self) -> Result<CatalogDocument, CatalogError> {
        if !self.path.exists() {
            return Err(CatalogError::NotFound(self.path.clone()));
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| CatalogError::Io { path: self.path.clone(), source })?;
        Ok(CatalogDocument::from_json(&text)?)
    }
}

type Fetch = dyn Fn(&str) -> Result<String, CatalogError> + Send + Sync;

/// A JSON document served over HTTP.
///
/// A remote document has no cheap change marker, so the marker advances once
/// per `ttl`. Without a TTL it never advances and only
/// [`CatalogStore::force_reload`](crate::CatalogStore::force_reload) refetches.
pub struct UrlSource {
    url: String,
    ttl: Option<Duration>,
    started: Instant,
    fetch: Box<Fetch>,
}

impl UrlSource {
    /// Fetch with a blocking HTTP client; non-2xx responses are errors.
    pub fn new(url: impl Into<String>, ttl: Option<Duration>) -> Result<Self, CatalogError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| CatalogError::Fetch { url: url.clone(), message: err.to_string() })?;

        Ok(Self::with_fetch(url, ttl, move |url: &str| {
            client
                .get(url)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(|err| CatalogError::Fetch { url: url.to_string(), message: err.to_string() })
        }))
    }

    /// Use `fetch` to retrieve the document body.
    pub fn with_fetch<F>(url: impl Into<String>, ttl: Option<Duration>, fetch: F) -> Self
    where
        F: Fn(&str) -> Result<String, CatalogError> + Send + Sync + 'static,
    {
        Self { url: url.into(), ttl, started: Instant::now(), fetch: Box::new(fetch) }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn marker_at(&self, now: Instant) -> ChangeMarker {
        let epoch = match self.ttl {
            Some(ttl) if !ttl.is_zero() => now.saturating_duration_since(self.started).as_nanos() / ttl.as_nanos(),
            _ => 0,
        };
        ChangeMarker::Epoch(u64::try_from(epoch).unwrap_or(u64::MAX))
    }
}

impl fmt::Debug for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlSource").field("url", &self.url).field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl CatalogSource for UrlSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn marker(&self) -> ChangeMarker {
        self.marker_at(Instant::now())
    }

    fn load(&self) -> Result<CatalogDocument, CatalogError> {
        let body = (self.fetch)(&self.url)?;
        Ok(CatalogDocument::from_json(&body)?)
    }
}

/// An in-memory document. `replace` bumps the revision so the store picks up
/// the new content on its next refresh.
#[derive(Debug, Default)]
pub struct InlineSource {
    state: RwLock<(u64, CatalogDocument)>,
}

impl InlineSource {
    pub fn new(document: CatalogDocument) -> Self {
        Self { state: RwLock::new((0, document)) }
    }

    /// Parse `json` eagerly; used by tests and fixtures.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(CatalogDocument::from_json(json)?))
    }

    pub fn replace(&self, document: CatalogDocument) {
        let mut state = self.state.write();
        state.0 += 1;
        state.1 = document;
    }
}

impl CatalogSource for InlineSource {
    fn describe(&self) -> String {
        "<inline>".to_string()
    }

    fn marker(&self) -> ChangeMarker {
        ChangeMarker::Revision(self.state.read().0)
    }

    fn load(&self) -> Result<CatalogDocument, CatalogError> {
        Ok(self.state.read().1.clone())
    }
}
