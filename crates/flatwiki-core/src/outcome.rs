//! Typed query outcomes and their textual rendering.
//!
//! Every engine operation returns an [`Outcome`]. Missing stores, missing
//! pages and malformed addresses are ordinary variants with a user-facing
//! rendering, so a transport can forward `outcome.to_string()` verbatim and
//! use [`Outcome::status`] for its own status codes.

use crate::error::{FlatwikiError, Result};
use crate::identity::PageName;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Coarse status of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The operation produced results
    Success,
    /// The operation ran but found nothing
    Empty,
    /// The requested page does not exist
    NotFound,
    /// The resource address was malformed
    InvalidAddress,
    /// The store root does not exist
    Unavailable,
    /// The request was rejected before reaching the engine.
    ///
    /// Transport-only: [`Outcome::status`] never returns it. Tool dispatch
    /// and request loops use it for unknown tools, bad arguments and
    /// malformed requests.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Empty => write!(f, "empty"),
            Status::NotFound => write!(f, "not_found"),
            Status::InvalidAddress => write!(f, "invalid_address"),
            Status::Unavailable => write!(f, "unavailable"),
            Status::Error => write!(f, "error"),
        }
    }
}

/// A successful payload that knows whether it is empty.
pub trait Report: fmt::Display {
    /// Returns true if the payload carries no results
    fn is_empty(&self) -> bool {
        false
    }
}

/// Result of one engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation ran; the payload may still be empty
    Ok(T),

    /// The requested page has no record
    NotFound(NotFound),

    /// The resource address was rejected before touching the store
    InvalidAddress { address: String, reason: String },

    /// The store root does not exist
    Unavailable { root: PathBuf },
}

impl<T: Report> Outcome<T> {
    /// Coarse status for transports
    pub fn status(&self) -> Status {
        match self {
            Outcome::Ok(payload) if payload.is_empty() => Status::Empty,
            Outcome::Ok(_) => Status::Success,
            Outcome::NotFound(_) => Status::NotFound,
            Outcome::InvalidAddress { .. } => Status::InvalidAddress,
            Outcome::Unavailable { .. } => Status::Unavailable,
        }
    }
}

impl<T> Outcome<T> {
    /// Returns the payload, if any
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(payload) => Some(payload),
            _ => None,
        }
    }

    /// Convert into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<T> {
        match self {
            Outcome::Ok(payload) => Ok(payload),
            Outcome::NotFound(nf) => Err(FlatwikiError::PageNotFound { name: nf.name }),
            Outcome::InvalidAddress { address, reason } => {
                Err(FlatwikiError::InvalidAddress { address, reason })
            }
            Outcome::Unavailable { root } => Err(FlatwikiError::StoreUnavailable { root }),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok(payload) => fmt::Display::fmt(payload, f),
            Outcome::NotFound(nf) => fmt::Display::fmt(nf, f),
            Outcome::InvalidAddress { address, .. } => write!(f, "Invalid URI: {}", address),
            Outcome::Unavailable { root } => {
                write!(f, "Error: Wiki directory {} does not exist", root.display())
            }
        }
    }
}

/// A page lookup that found no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFound {
    /// The name as the caller supplied it
    pub name: String,

    /// Near matches in enumeration order
    pub suggestions: Vec<PageName>,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page '{}' not found.", self.name)?;
        if !self.suggestions.is_empty() {
            write!(f, "\n\nSimilar pages found:")?;
            for page in &self.suggestions {
                write!(f, "\n- {}", page)?;
            }
        }
        write!(f, "\n\nUse 'list_pages' to see all available pages.")
    }
}

// === Search ===

/// One search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Matching page
    pub page: PageName,

    /// Context around the first match, wrapped in `...`
    pub snippet: String,
}

/// Search results, truncated for display with the true total kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// The query as matched (lowercased unless case-sensitive)
    pub query: String,

    /// Whether matching respected case
    pub case_sensitive: bool,

    /// Number of matching pages
    pub total: usize,

    /// The first matches in enumeration order
    pub hits: Vec<SearchHit>,
}

impl SearchReport {
    /// Matches counted but not enumerated
    pub fn overflow(&self) -> usize {
        self.total.saturating_sub(self.hits.len())
    }
}

impl Report for SearchReport {
    fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "No results found for '{}'", self.query);
        }

        write!(f, "Found {} result(s) for '{}':\n\n", self.total, self.query)?;
        for hit in &self.hits {
            write!(f, "**{}**\n{}\n\n", hit.page, hit.snippet)?;
        }

        let overflow = self.overflow();
        if overflow > 0 {
            write!(f, "\n... and {} more results", overflow)?;
        }
        Ok(())
    }
}

// === Read ===

/// A page body with the title it was requested under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    /// The requested name, used as the heading
    pub title: String,

    /// Decoded body
    pub body: String,
}

impl Report for PageText {}

impl fmt::Display for PageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# {}\n\n{}", self.title, self.body)
    }
}

// === List ===

/// Pages of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupListing {
    /// Group name (`Root` for ungrouped pages)
    pub name: String,

    /// Number of pages in the group
    pub total: usize,

    /// The first pages in sorted order
    pub pages: Vec<PageName>,
}

impl GroupListing {
    /// Pages counted but not shown
    pub fn overflow(&self) -> usize {
        self.total.saturating_sub(self.pages.len())
    }
}

/// Grouped page listing, groups sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageListing {
    /// Group filter that was applied
    pub filter: Option<String>,

    /// Number of listed pages across all groups
    pub total: usize,

    /// Groups in ascending name order
    pub groups: Vec<GroupListing>,
}

impl PageListing {
    /// Find a group by name
    pub fn group(&self, name: &str) -> Option<&GroupListing> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl Report for PageListing {
    fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl fmt::Display for PageListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "No pages found")?;
            if let Some(ref group) = self.filter {
                write!(f, " in group '{}'", group)?;
            }
            return Ok(());
        }

        write!(f, "Available pages ({}):\n\n", self.total)?;
        for group in &self.groups {
            writeln!(f, "**{}** ({} pages)", group.name, group.total)?;
            for page in &group.pages {
                writeln!(f, "  - {}", page)?;
            }
            let overflow = group.overflow();
            if overflow > 0 {
                writeln!(f, "  ... and {} more pages", overflow)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// === Resources ===

/// A page advertised as an addressable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResource {
    /// `<scheme>://<filename>`
    pub uri: String,

    /// Page identity
    pub name: PageName,

    /// Content type
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// One-line description
    pub description: String,
}

/// All page resources in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceList {
    pub resources: Vec<PageResource>,
}

impl Report for ResourceList {
    fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl fmt::Display for ResourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.resources.is_empty() {
            return write!(f, "No resources found");
        }
        for (i, resource) in self.resources.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}\t{}", resource.uri, resource.description)?;
        }
        Ok(())
    }
}

/// Decoded body of a resource, without heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceBody {
    pub uri: String,
    pub text: String,
}

impl Report for ResourceBody {}

impl fmt::Display for ResourceBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
