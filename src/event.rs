use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::cache::PersistenceError;
use crate::model::{MovieDetail, PageResponse};

/// Everything that can happen to the core.
///
/// Shell-originated commands come first; the remaining variants are
/// completions the core's own capability requests feed back in. Every
/// completion carries only domain types, so the enum serializes
/// cleanly across the bridge and tests can construct any variant
/// directly.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // -- commands from the shell
    Start { api_key: String },
    LoadInitial,
    LoadMoreIfNeeded { visible_index: usize },
    QueryChanged { query: String },
    MovieSelected { movie_id: u64 },
    DetailDismissed,
    NetworkStatusChanged { online: bool },

    // -- completions
    TrendingPageLoaded {
        generation: u64,
        page: u32,
        result: Box<Result<PageResponse, ApiError>>,
    },
    DetailLoaded {
        movie_id: u64,
        result: Box<Result<MovieDetail, ApiError>>,
    },
    CacheRead {
        generation: u64,
        result: Result<Option<Vec<u8>>, PersistenceError>,
    },
    CacheWritten {
        result: Result<(), PersistenceError>,
    },
}
