//! The movie-list synchronization state machine.
//!
//! One `update` call at a time mutates the model: the runtime
//! serializes events, so page completions, cache reads, connectivity
//! flips and search keystrokes can never interleave mid-mutation.
//! Fetches are single-flight and tagged with a generation counter;
//! completions from a superseded cycle are logged and dropped.

use crux_kv::KeyValueOutput;
use serde::{Deserialize, Serialize};

use crate::api::{self, ApiError};
use crate::cache::{self, PersistenceError};
use crate::capabilities::Capabilities;
use crate::event::Event;
use crate::model::{Model, Movie, MovieDetail, PageResponse};
use crate::{FIRST_PAGE, PREFETCH_THRESHOLD};

#[derive(Default)]
pub struct App;

/// Detail screen state, present only while a movie is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub movie_id: u64,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Snapshot the shell renders from. `movies` is the filtered list;
/// the unfiltered one never leaves the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub movies: Vec<Movie>,
    pub is_loading: bool,
    pub has_data: bool,
    pub has_search_results: bool,
    pub online: bool,
    pub error: Option<String>,
    pub detail: Option<DetailView>,
}

impl App {
    /// Fetch one page of the trending feed, or fall back to the cache
    /// when offline. No-op while a fetch is already in flight; in
    /// particular `current_page` must not move for a dropped request.
    fn start_fetch(model: &mut Model, caps: &Capabilities, page: u32) {
        if model.is_loading {
            return;
        }
        if !model.online {
            Self::read_cache(model, caps);
            return;
        }

        let url = match api::trending_url(&model.api, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(page, error = %e, "could not build trending url");
                model.last_error = Some(e);
                Self::read_cache(model, caps);
                return;
            }
        };

        model.is_loading = true;
        let generation = model.next_generation();
        tracing::debug!(page, generation, "fetching trending page");

        caps.http
            .get(url.as_str())
            .expect_json()
            .send(move |result| Event::TrendingPageLoaded {
                generation,
                page,
                result: Box::new(api::into_api_result(result)),
            });
    }

    /// Read the whole cached list. Starts a new generation so that any
    /// in-flight page completion loses the race to this read.
    fn read_cache(model: &mut Model, caps: &Capabilities) {
        let generation = model.next_generation();
        caps.key_value
            .read(cache::MOVIE_CACHE_KEY, move |output| Event::CacheRead {
                generation,
                result: match output {
                    KeyValueOutput::Read(bytes) => Ok(bytes),
                    KeyValueOutput::Write(_) => {
                        Err(PersistenceError::read("unexpected write response"))
                    }
                },
            });
    }

    /// Persist the page-1 list. Encode failures are logged and the
    /// write skipped; the cache is best-effort by policy.
    fn write_cache(model: &Model, caps: &Capabilities) {
        match cache::encode(&model.movies) {
            Ok(bytes) => {
                caps.key_value
                    .write(cache::MOVIE_CACHE_KEY, bytes, |output| Event::CacheWritten {
                        result: match output {
                            KeyValueOutput::Write(true) => Ok(()),
                            KeyValueOutput::Write(false) => {
                                Err(PersistenceError::write("store rejected the write"))
                            }
                            KeyValueOutput::Read(_) => {
                                Err(PersistenceError::write("unexpected read response"))
                            }
                        },
                    });
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping cache write");
            }
        }
    }

    fn fetch_detail(model: &mut Model, caps: &Capabilities, movie_id: u64) {
        let url = match api::detail_url(&model.api, movie_id) {
            Ok(url) => url,
            Err(e) => {
                model.detail_loading = false;
                model.detail_error = Some(e);
                return;
            }
        };

        model.detail_loading = true;
        caps.http
            .get(url.as_str())
            .expect_json()
            .send(move |result| Event::DetailLoaded {
                movie_id,
                result: Box::new(api::into_detail_result(movie_id, result)),
            });
    }

    fn handle_page_loaded(
        model: &mut Model,
        caps: &Capabilities,
        page: u32,
        result: Result<PageResponse, ApiError>,
    ) {
        model.is_loading = false;

        match result {
            Ok(response) => {
                model.total_pages = response.total_pages.max(1);
                model.current_page = page;
                model.last_error = None;

                if page == FIRST_PAGE {
                    model.replace_movies(response.results);
                    Self::write_cache(model, caps);
                } else {
                    model.append_movies(response.results);
                }
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "trending fetch failed");
                model.last_error = Some(e);
                Self::read_cache(model, caps);
            }
        }
    }

    fn handle_cache_read(model: &mut Model, result: Result<Option<Vec<u8>>, PersistenceError>) {
        model.is_loading = false;

        // Any failure on this path degrades to the empty list; the
        // cache never surfaces an error of its own.
        let movies = match result {
            Ok(Some(bytes)) => match cache::decode(&bytes) {
                Ok(movies) => movies,
                Err(e) => {
                    tracing::warn!(error = %e, "cache decode failed");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "cache read failed");
                Vec::new()
            }
        };

        model.replace_movies(movies);
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::Start { api_key } => {
                model.api.api_key = api_key;
                caps.connectivity
                    .watch(|online| Event::NetworkStatusChanged { online });
                // Warm the first paint from the cache; the fetch starts
                // once connectivity reports online.
                Self::read_cache(model, caps);
                caps.render.render();
            }

            Event::LoadInitial => {
                if model.is_loading {
                    return;
                }
                model.current_page = FIRST_PAGE;
                Self::start_fetch(model, caps, FIRST_PAGE);
                caps.render.render();
            }

            Event::LoadMoreIfNeeded { visible_index } => {
                let near_end = visible_index + PREFETCH_THRESHOLD >= model.filtered.len();
                let more_pages = model.current_page < model.total_pages;
                if near_end && more_pages && !model.is_loading {
                    let next_page = model.current_page + 1;
                    Self::start_fetch(model, caps, next_page);
                    caps.render.render();
                }
            }

            Event::QueryChanged { query } => {
                model.query = query;
                model.refilter();
                caps.render.render();
            }

            Event::MovieSelected { movie_id } => {
                model.selected_movie_id = Some(movie_id);
                model.detail = None;
                model.detail_error = None;
                Self::fetch_detail(model, caps, movie_id);
                caps.render.render();
            }

            Event::DetailDismissed => {
                model.selected_movie_id = None;
                model.detail = None;
                model.detail_loading = false;
                model.detail_error = None;
                caps.render.render();
            }

            Event::NetworkStatusChanged { online } => {
                if model.online == online {
                    return;
                }
                model.online = online;
                tracing::info!(online, "connectivity changed");

                if online {
                    // Exactly one refresh per offline-to-online flip.
                    self.update(Event::LoadInitial, model, caps);
                } else {
                    model.is_loading = false;
                    Self::read_cache(model, caps);
                }
                caps.render.render();
            }

            Event::TrendingPageLoaded {
                generation,
                page,
                result,
            } => {
                if !model.is_current(generation) {
                    tracing::debug!(generation, page, "dropping stale page completion");
                    return;
                }
                Self::handle_page_loaded(model, caps, page, *result);
                caps.render.render();
            }

            Event::CacheRead { generation, result } => {
                if !model.is_current(generation) {
                    tracing::debug!(generation, "dropping stale cache read");
                    return;
                }
                Self::handle_cache_read(model, result);
                caps.render.render();
            }

            Event::CacheWritten { result } => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "cache write failed");
                }
            }

            Event::DetailLoaded { movie_id, result } => {
                if model.selected_movie_id != Some(movie_id) {
                    tracing::debug!(movie_id, "dropping detail for deselected movie");
                    return;
                }
                model.detail_loading = false;
                match *result {
                    Ok(detail) => {
                        model.detail = Some(detail);
                        model.detail_error = None;
                    }
                    Err(e) => {
                        model.detail_error = Some(e);
                    }
                }
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            movies: model.filtered.clone(),
            is_loading: model.is_loading,
            has_data: model.has_data,
            has_search_results: model.has_search_results,
            online: model.online,
            error: model.last_error.as_ref().map(ApiError::user_message),
            detail: model.selected_movie_id.map(|movie_id| DetailView {
                movie_id,
                detail: model.detail.clone(),
                is_loading: model.detail_loading,
                error: model.detail_error.as_ref().map(ApiError::user_message),
            }),
        }
    }
}
