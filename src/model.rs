use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::{ApiConfig, ApiError};
use crate::FIRST_PAGE;

/// One movie in the trending feed.
///
/// Field names match the TMDB wire format, so the same struct decodes
/// page responses and round-trips through the cache envelope. Identity
/// is the `id`; pages occasionally repeat entries, so appends
/// de-duplicate on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
}

/// One page of the trending feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

/// Extended detail for a single movie, fetched per detail view with
/// `append_to_response=credits`. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub imdb_id: Option<String>,
    pub credits: Option<Credits>,
    pub vote_average: f64,
}

/// All core state. Mutated exclusively inside `App::update`, one event
/// at a time, so there is no interior locking anywhere.
#[derive(Debug, Serialize, Deserialize)]
pub struct Model {
    pub api: ApiConfig,

    /// Last connectivity report from the shell; `false` until the
    /// first one arrives.
    pub online: bool,

    // Sync state
    pub movies: Vec<Movie>,
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
    pub has_data: bool,
    pub last_error: Option<ApiError>,
    /// Monotonic tag for the current fetch cycle. Completions carrying
    /// an older tag are stale and must be discarded.
    pub fetch_generation: u64,

    // Search state, fully derived from `movies` + `query`
    pub query: String,
    pub filtered: Vec<Movie>,
    pub has_search_results: bool,

    // Detail state
    pub selected_movie_id: Option<u64>,
    pub detail: Option<MovieDetail>,
    pub detail_loading: bool,
    pub detail_error: Option<ApiError>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            online: false,
            movies: Vec::new(),
            current_page: FIRST_PAGE,
            total_pages: 1,
            is_loading: false,
            has_data: true,
            last_error: None,
            fetch_generation: 0,
            query: String::new(),
            filtered: Vec::new(),
            has_search_results: true,
            selected_movie_id: None,
            detail: None,
            detail_loading: false,
            detail_error: None,
        }
    }
}

impl Model {
    /// Recompute `filtered` and `has_search_results` from the current
    /// list and query. Called after every mutation of either input.
    ///
    /// An empty query means "no active search": it matches everything
    /// and resets `has_search_results` to `true`, which is distinct
    /// from a search that found nothing.
    pub fn refilter(&mut self) {
        if self.query.is_empty() {
            self.filtered = self.movies.clone();
            self.has_search_results = true;
        } else {
            let needle = self.query.to_lowercase();
            self.filtered = self
                .movies
                .iter()
                .filter(|movie| movie.title.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            self.has_search_results = !self.filtered.is_empty();
        }
    }

    /// Replace the whole list (page-1 result or cache fallback).
    pub fn replace_movies(&mut self, movies: Vec<Movie>) {
        self.movies = movies;
        self.has_data = !self.movies.is_empty();
        self.refilter();
    }

    /// Append a later page, skipping ids already present.
    pub fn append_movies(&mut self, incoming: Vec<Movie>) {
        let seen: HashSet<u64> = self.movies.iter().map(|m| m.id).collect();
        self.movies
            .extend(incoming.into_iter().filter(|m| !seen.contains(&m.id)));
        self.refilter();
    }

    /// Start a new fetch cycle, invalidating any completion still in
    /// flight from the previous one.
    pub fn next_generation(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.fetch_generation
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.fetch_generation
    }
}
