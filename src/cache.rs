//! On-device movie-list cache codec.
//!
//! The whole trending list lives under a single key in the shell's
//! key-value store as a versioned JSON envelope. Writes are
//! replace-all, issued only for page-1 results; reads degrade to the
//! empty list on any failure so the cache can never take the app down.

use serde::{Deserialize, Serialize};

use crate::model::Movie;

/// The one key the movie list is stored under.
pub const MOVIE_CACHE_KEY: &str = "movies.v1";

/// Bumped whenever the envelope layout changes; readers reject
/// anything else rather than guess.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    schema_version: u32,
    movies: Vec<Movie>,
}

/// Cache and key-value store failures. Swallowed by policy: logged,
/// degraded to the empty list, never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PersistenceError {
    #[error("cache read failed: {message}")]
    Read { message: String },
    #[error("cache write failed: {message}")]
    Write { message: String },
    #[error("cache codec failed: {message}")]
    Codec { message: String },
    #[error("cache schema {found} is not supported (expected {supported})")]
    SchemaMismatch { found: u32, supported: u32 },
}

impl PersistenceError {
    pub fn read(source: impl std::fmt::Display) -> Self {
        Self::Read {
            message: source.to_string(),
        }
    }

    pub fn write(source: impl std::fmt::Display) -> Self {
        Self::Write {
            message: source.to_string(),
        }
    }
}

pub fn encode(movies: &[Movie]) -> Result<Vec<u8>, PersistenceError> {
    let envelope = CacheEnvelope {
        schema_version: CACHE_SCHEMA_VERSION,
        movies: movies.to_vec(),
    };
    serde_json::to_vec(&envelope).map_err(|e| PersistenceError::Codec {
        message: e.to_string(),
    })
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Movie>, PersistenceError> {
    let envelope: CacheEnvelope =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::Codec {
            message: e.to_string(),
        })?;
    if envelope.schema_version != CACHE_SCHEMA_VERSION {
        return Err(PersistenceError::SchemaMismatch {
            found: envelope.schema_version,
            supported: CACHE_SCHEMA_VERSION,
        });
    }
    Ok(envelope.movies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.into(),
            overview: "overview".into(),
            poster_path: Some("/p.jpg".into()),
            release_date: Some("2024-01-01".into()),
            vote_average: 7.5,
        }
    }

    #[test]
    fn encode_decode_preserves_movies() {
        let movies = vec![movie(1, "Avengers"), movie(2, "Batman")];
        let bytes = encode(&movies).unwrap();
        assert_eq!(decode(&bytes).unwrap(), movies);
    }

    #[test]
    fn empty_list_round_trips() {
        let bytes = encode(&[]).unwrap();
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let bytes = br#"{"schema_version": 99, "movies": []}"#;
        assert_eq!(
            decode(bytes),
            Err(PersistenceError::SchemaMismatch {
                found: 99,
                supported: CACHE_SCHEMA_VERSION
            })
        );
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(
            decode(b"not json"),
            Err(PersistenceError::Codec { .. })
        ));
    }
}
