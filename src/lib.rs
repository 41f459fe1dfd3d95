//! Shared core for the trending-movies mobile client.
//!
//! The core owns the movie-list synchronization state machine: it
//! reconciles the remote paginated feed, the on-device cache, live
//! connectivity and a live search filter into one observable list.
//! Shells (iOS/Android/Web) drive it with [`Event`]s and read
//! [`ViewModel`] snapshots back; raw HTTP, raw key-value storage and
//! network-path observation stay on the shell side behind capabilities.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod app;
pub mod cache;
pub mod capabilities;
pub mod event;
pub mod model;

pub use api::{ApiConfig, ApiError};
pub use app::{App, DetailView, ViewModel};
pub use cache::PersistenceError;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{Model, Movie, MovieDetail, PageResponse};

/// Items from the end of the filtered list at which the next page is
/// prefetched, so the feed never visibly runs dry mid-scroll.
pub const PREFETCH_THRESHOLD: usize = 5;

/// Page numbering is 1-based; page 1 replaces, later pages append.
pub const FIRST_PAGE: u32 = 1;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
