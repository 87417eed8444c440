// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod alias;
pub mod catalog;
pub mod category;
pub mod gazetteer;
pub mod index;
pub mod location;
pub mod query;
pub mod resolver;
pub mod store;
pub mod suggest;

use std::path::PathBuf;
use thiserror::Error;

pub use alias::{AliasRecord, AliasTable};
pub use catalog::{load_catalog, sample_catalog, CatalogItem};
pub use category::{detect_category, Category};
pub use gazetteer::{build_location_maps, Gazetteer};
pub use index::IntentIndex;
pub use location::{Level, LocationLevel, MyLocation};
pub use query::{parse_query, Connector, ParsedIntent, SearchContext};
pub use resolver::{longest_location_match, resolve_location_token};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SmartSettings};
pub use suggest::{get_suggestion, near_me_row, quick_actions, NearMeRow, Suggestion, SuggestionParams};

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid catalog {path:?}: {reason}")]
    Catalog { path: PathBuf, reason: String },
    #[error("Invalid alias: {0}")]
    InvalidAlias(String),
    #[error("Unknown location level: {0}")]
    UnknownLevel(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, IntentError>;
