//! The outward-facing content API.
//!
//! [`Site`] wires the content store, the schema validator, and the
//! transformation pipeline together and exposes the two operations the
//! page layer consumes: a date-ordered corpus listing and a
//! single-document load. Malformed author content is a routine
//! condition here, not an exceptional one — every per-document failure
//! collapses to exclusion from the listing or to [`NotFound`].

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::frontmatter::{self, FrontMatter};
use crate::pipeline::{self, Pipeline};
use crate::slug;
use crate::store::{ContentStore, FsStore, StoreError};
use crate::toc::{Heading, TocNode};

/// The uniform "no such document" outcome.
///
/// Carries no cause: the page layer cannot tell a storage miss from a
/// schema or render failure, so storage details never leak outward.
/// The distinguishing detail goes to the debug log instead.
#[derive(Debug, thiserror::Error)]
#[error("document not found")]
pub struct NotFound;

/// One corpus listing entry: the lightweight projection of a document.
///
/// Carries everything the listing and feed collaborators need; the
/// body is never rendered for these.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// A fully rendered document.
#[derive(Debug, Serialize)]
pub struct RenderedPost {
    pub slug: String,
    pub front_matter: FrontMatter,
    pub html: String,
    pub headings: Vec<Heading>,
    pub toc: Vec<TocNode>,
}

/// A content site: one corpus, one pipeline, two entry points.
pub struct Site {
    config: SiteConfig,
    store: Box<dyn ContentStore>,
    pipeline: Pipeline,
}

impl Site {
    /// Open a site over the filesystem store at `config.content_dir`.
    pub fn open(config: SiteConfig) -> Result<Self, StoreError> {
        let store = FsStore::open(&config.content_dir)?;
        Ok(Self::with_store(config, Box::new(store)))
    }

    /// Build a site over any content store implementation.
    pub fn with_store(config: SiteConfig, store: Box<dyn ContentStore>) -> Self {
        let pipeline = Pipeline::new(&config);
        Self {
            config,
            store,
            pipeline,
        }
    }

    /// List every valid document, newest first.
    ///
    /// Runs the metadata-only pipeline path per document — never a full
    /// render. Documents that cannot be read, decoded, or validated are
    /// excluded without aborting the listing. `None` or `Some(0)`
    /// returns the whole corpus; anything else truncates the sorted
    /// listing to a prefix of that length.
    pub fn list_documents(&self, limit: Option<usize>) -> Result<Vec<PostSummary>, StoreError> {
        let keys = self.store.list_keys()?;

        // Per-document extraction is independent and side-effect-free,
        // so the corpus is walked in parallel. Collect preserves key
        // order, which is the tie-break for equal dates.
        let mut posts: Vec<PostSummary> = keys
            .par_iter()
            .filter_map(|key| self.summarize(key))
            .collect();

        // Stable sort: equal dates keep their key order.
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(limit) = limit.filter(|n| *n > 0) {
            posts.truncate(limit);
        }
        Ok(posts)
    }

    /// Metadata-only view of one stored document, or `None` if it is
    /// invalid in any way.
    fn summarize(&self, key: &str) -> Option<PostSummary> {
        let slug = slug::from_key(key)?;

        let bytes = match self.store.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "skipping unreadable document");
                return None;
            }
        };
        let raw = match pipeline::decode(&bytes) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, %err, "skipping undecodable document");
                return None;
            }
        };

        match self.pipeline.extract_metadata_only(raw) {
            Ok(fm) => Some(PostSummary {
                slug,
                title: fm.title,
                date: fm.date,
                description: fm.description,
            }),
            Err(err) => {
                warn!(key, %err, "skipping document with invalid front matter");
                None
            }
        }
    }

    /// Load and fully render one document by slug.
    ///
    /// A storage miss, a schema failure, and a render failure are
    /// indistinguishable from outside: all come back as [`NotFound`].
    pub fn load_document(&self, slug_str: &str) -> Result<RenderedPost, NotFound> {
        let key = slug::to_key(slug_str).ok_or(NotFound)?;

        let bytes = match self.store.read(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Err(NotFound),
            Err(err) => {
                debug!(slug = slug_str, %err, "store read failed");
                return Err(NotFound);
            }
        };
        let raw = pipeline::decode(&bytes).map_err(|err| {
            debug!(slug = slug_str, %err, "document is not valid UTF-8");
            NotFound
        })?;

        let parsed = frontmatter::parse(raw, &self.config.required_fields).map_err(|err| {
            debug!(slug = slug_str, %err, "front matter rejected");
            NotFound
        })?;

        let output = self.pipeline.render(parsed.body).map_err(|err| {
            debug!(slug = slug_str, %err, "render failed");
            NotFound
        })?;

        Ok(RenderedPost {
            slug: slug_str.to_string(),
            front_matter: parsed.front_matter,
            html: output.html,
            headings: output.headings,
            toc: output.toc,
        })
    }

    /// Stylesheet for the configured highlight theme, for the page
    /// layer to inline or serve alongside rendered documents.
    pub fn highlight_css(&self) -> Option<String> {
        crate::highlight::Highlighter::new(&self.config.theme).theme_css()
    }
}
