//! The page-store query engine.
//!
//! [`QueryEngine`] answers search, read and list queries, and enumerates
//! pages as addressable resources. It keeps no index: every call enumerates
//! the store through its [`PageStore`] and decodes records on the fly.
//!
//! ## Ordering
//!
//! - `search` and `resources` follow store enumeration order, which is
//!   whatever the directory yields. Callers must not assume it is sorted.
//! - `list` sorts filenames first, then groups, then sorts groups by name.
//!
//! ## Concurrency
//!
//! The engine is immutable after construction and can be shared across
//! threads behind an `Arc`. Large searches decode candidates on the rayon
//! pool; indexed parallel collection keeps enumeration order.

use crate::config::{Config, PerformanceConfig, QueryConfig, ResourcesConfig};
use crate::identity::{identity_to_filename, in_group, loose_key, PageName};
use crate::outcome::{
    GroupListing, NotFound, Outcome, PageListing, PageResource, PageText, ResourceBody,
    ResourceList, SearchHit, SearchReport,
};
use crate::record;
use crate::scanner::{is_record_name, DirectoryStore, PageStore};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Query engine over one page store.
///
/// ## Example
///
/// ```rust,no_run
/// use flatwiki_core::QueryEngine;
///
/// let engine = QueryEngine::open("/wiki_data");
/// println!("{}", engine.search("recipe", false));
/// println!("{}", engine.read("Main/HomePage"));
/// println!("{}", engine.list(Some("Main")));
/// ```
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn PageStore>,
    query: QueryConfig,
    performance: PerformanceConfig,
    resources: ResourcesConfig,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("store", &self.store.name())
            .field("root", &self.store.root())
            .field("query", &self.query)
            .finish()
    }
}

impl QueryEngine {
    /// Create an engine over `store` using the query, performance and
    /// resource sections of `config`.
    pub fn new(store: Arc<dyn PageStore>, config: &Config) -> Self {
        QueryEngine {
            store,
            query: config.query.clone(),
            performance: config.performance.clone(),
            resources: config.resources.clone(),
        }
    }

    /// Create an engine over a record directory with default settings.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DirectoryStore::new(root)), &Config::default())
    }

    /// Create an engine from configuration, resolving the store root with
    /// an optional explicit override.
    pub fn from_config(config: &Config, root: Option<&Path>) -> Self {
        let root = config.store_root(root);
        info!(root = %root.display(), "Opening page store");
        Self::new(Arc::new(DirectoryStore::new(root)), config)
    }

    /// The underlying store
    pub fn store(&self) -> &dyn PageStore {
        self.store.as_ref()
    }

    fn unavailable<T>(&self) -> Outcome<T> {
        let root = self.store.root().to_path_buf();
        warn!(root = %root.display(), "Wiki directory does not exist");
        Outcome::Unavailable { root }
    }

    fn load(&self, filename: &str) -> String {
        record::decode_or_placeholder(filename, self.store.read(filename))
    }

    /// Full-text substring search across every page body.
    ///
    /// Case-insensitive unless `case_sensitive` is set. An empty query
    /// matches every page.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str, case_sensitive: bool) -> Outcome<SearchReport> {
        if !self.store.is_available() {
            return self.unavailable();
        }

        let needle = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };

        let candidates: Vec<String> = self.store.scan().collect();
        let matcher = |filename: &String| self.match_page(filename, &needle, case_sensitive);

        let use_parallel = self.performance.parallel_search
            && candidates.len() > self.performance.parallel_threshold;
        let mut hits: Vec<SearchHit> = if use_parallel {
            candidates.par_iter().filter_map(matcher).collect()
        } else {
            candidates.iter().filter_map(matcher).collect()
        };

        let total = hits.len();
        hits.truncate(self.query.max_search_results);

        debug!(
            candidates = candidates.len(),
            matches = total,
            parallel = use_parallel,
            "Search complete"
        );

        Outcome::Ok(SearchReport {
            query: needle,
            case_sensitive,
            total,
            hits,
        })
    }

    fn match_page(&self, filename: &str, needle: &str, case_sensitive: bool) -> Option<SearchHit> {
        let content = self.load(filename);
        let haystack = if case_sensitive {
            content.clone()
        } else {
            content.to_lowercase()
        };

        let byte_idx = haystack.find(needle)?;
        Some(SearchHit {
            page: PageName::from_filename(filename),
            snippet: snippet(&content, &haystack[..byte_idx], self.query.snippet_radius),
        })
    }

    /// Read one page by identity (`Group/Page` or `Group.Page`).
    ///
    /// A missing page yields `NotFound` with up to `max_suggestions` pages
    /// whose loose name contains the loose form of the request.
    #[instrument(skip(self))]
    pub fn read(&self, page_name: &str) -> Outcome<PageText> {
        if !self.store.is_available() {
            return self.unavailable();
        }

        let filename = identity_to_filename(page_name);
        if self.store.contains(&filename) {
            return Outcome::Ok(PageText {
                title: page_name.to_string(),
                body: self.load(&filename),
            });
        }

        let term = loose_key(&filename);
        let suggestions: Vec<PageName> = self
            .store
            .scan()
            .filter(|candidate| loose_key(candidate).contains(&term))
            .take(self.query.max_suggestions)
            .map(|candidate| PageName::from_filename(&candidate))
            .collect();

        debug!(
            page = %page_name,
            suggestions = suggestions.len(),
            "Page not found"
        );

        Outcome::NotFound(NotFound {
            name: page_name.to_string(),
            suggestions,
        })
    }

    /// List pages grouped by their group, optionally restricted to one
    /// group. An empty filter string means no filter.
    #[instrument(skip(self))]
    pub fn list(&self, group_filter: Option<&str>) -> Outcome<PageListing> {
        if !self.store.is_available() {
            return self.unavailable();
        }

        let filter = group_filter.filter(|g| !g.is_empty());

        let mut grouped: BTreeMap<String, Vec<PageName>> = BTreeMap::new();
        let mut total = 0;
        for filename in self.store.scan_sorted() {
            let page = PageName::from_filename(&filename);
            if let Some(group) = filter {
                if !in_group(page.as_str(), group) {
                    continue;
                }
            }
            total += 1;
            grouped
                .entry(page.group().to_string())
                .or_default()
                .push(page);
        }

        let limit = self.query.max_group_listing;
        let groups = grouped
            .into_iter()
            .map(|(name, mut pages)| {
                let group_total = pages.len();
                pages.truncate(limit);
                GroupListing {
                    name,
                    total: group_total,
                    pages,
                }
            })
            .collect::<Vec<_>>();

        debug!(pages = total, groups = groups.len(), "Listing complete");

        Outcome::Ok(PageListing {
            filter: filter.map(str::to_string),
            total,
            groups,
        })
    }

    /// Every page as an addressable resource, in enumeration order.
    #[instrument(skip(self))]
    pub fn resources(&self) -> Outcome<ResourceList> {
        if !self.store.is_available() {
            return self.unavailable();
        }

        let resources: Vec<PageResource> = self
            .store
            .scan()
            .map(|filename| self.resource_for(&filename))
            .collect();

        info!(count = resources.len(), "Found wiki pages");
        Outcome::Ok(ResourceList { resources })
    }

    fn resource_for(&self, filename: &str) -> PageResource {
        let name = PageName::from_filename(filename);
        PageResource {
            uri: format!("{}{}", self.uri_prefix(), filename),
            description: format!("Wiki page: {}", name),
            name,
            mime_type: self.resources.mime_type.clone(),
        }
    }

    fn uri_prefix(&self) -> String {
        format!("{}://", self.resources.scheme)
    }

    /// Read a page by resource URI (`<scheme>://<filename>`).
    ///
    /// The address is validated before the store is touched.
    #[instrument(skip(self))]
    pub fn read_resource(&self, uri: &str) -> Outcome<ResourceBody> {
        let prefix = self.uri_prefix();
        let Some(filename) = uri.strip_prefix(&prefix) else {
            debug!(uri = %uri, "Rejected resource address without scheme prefix");
            return Outcome::InvalidAddress {
                address: uri.to_string(),
                reason: format!("expected prefix {}", prefix),
            };
        };

        if !is_record_name(filename) {
            debug!(uri = %uri, "Rejected resource address with bad record name");
            return Outcome::InvalidAddress {
                address: uri.to_string(),
                reason: "not a page record name".to_string(),
            };
        }

        if !self.store.is_available() {
            return self.unavailable();
        }

        if !self.store.contains(filename) {
            return Outcome::NotFound(NotFound {
                name: filename.to_string(),
                suggestions: Vec::new(),
            });
        }

        Outcome::Ok(ResourceBody {
            uri: uri.to_string(),
            text: self.load(filename),
        })
    }
}

/// Cut a window of `radius` characters on each side of a match and wrap it
/// in `...`.
///
/// `before_match` is the case-normalized text preceding the match; its
/// character count locates the match in `content`.
fn snippet(content: &str, before_match: &str, radius: usize) -> String {
    let index = before_match.chars().count();
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius);

    let window: String = content
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    format!("...{}...", window.trim())
}
