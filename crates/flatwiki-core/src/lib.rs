//! # Flatwiki Core Library
//!
//! This crate answers queries against a directory of flat-file wiki page
//! records. There is no persistent index: each query enumerates the store,
//! decodes the records it needs and materializes its result before
//! returning.
//!
//! ## Architecture
//!
//! - **Record** (`record`): Decodes the `text=` field of one page record
//! - **Identity** (`identity`): Maps filenames to page names and groups
//! - **Scanner** (`scanner`): The `PageStore` trait and the directory store
//! - **Engine** (`engine`): Search, read, list and resource operations
//! - **Outcome** (`outcome`): Typed results and their text rendering
//! - **Tools** (`tools`): Tool catalogue and dispatch for transports
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use flatwiki_core::{Config, QueryEngine, Status};
//!
//! let config = Config::load().unwrap_or_default();
//! let engine = QueryEngine::from_config(&config, None);
//!
//! let outcome = engine.search("install", false);
//! if outcome.status() == Status::Unavailable {
//!     eprintln!("store is missing");
//! }
//! println!("{}", outcome);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod record;
pub mod scanner;
pub mod tools;

// Re-export commonly used types
pub use config::Config;
pub use engine::QueryEngine;
pub use error::{FlatwikiError, Result};
pub use identity::PageName;
pub use outcome::{
    NotFound, Outcome, PageListing, PageResource, PageText, Report, ResourceBody, ResourceList,
    SearchHit, SearchReport, Status,
};
pub use scanner::{DirectoryStore, PageStore};
pub use tools::{ToolRegistry, ToolResponse, ToolSpec};
