//! TMDB request construction and response adaptation.
//!
//! The core never performs I/O; it builds URLs here, hands them to the
//! shell through the HTTP capability, and converts the raw outcome back
//! into [`ApiError`] so events carry only domain types.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::DEFAULT_BASE_URL;

/// Remote endpoint configuration, injected by the shell at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

/// Everything that can go wrong talking to the feed.
///
/// Serde derives let the error travel inside events and across the FFI
/// bridge; `thiserror` gives it a diagnostic `Display`, while
/// [`ApiError::user_message`] produces the copy a shell may show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("request timed out")]
    Timeout,
    #[error("server returned status {status}")]
    Status { status: u16 },
    #[error("could not decode response: {message}")]
    Decode { message: String },
    #[error("movie {id} not found")]
    NotFound { id: u64 },
}

impl ApiError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            Self::Timeout => "The request timed out. Please try again.".into(),
            Self::Status { .. } | Self::Decode { .. } => {
                "Something went wrong loading movies. Please try again later.".into()
            }
            Self::NotFound { .. } => "This movie could not be found.".into(),
        }
    }
}

/// `GET {base}/trending/movie/day?api_key=…&page=n`
pub fn trending_url(config: &ApiConfig, page: u32) -> Result<Url, ApiError> {
    let mut url = parse_base(config, &["trending", "movie", "day"])?;
    url.query_pairs_mut()
        .append_pair("api_key", &config.api_key)
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// `GET {base}/movie/{id}?api_key=…&append_to_response=credits`
pub fn detail_url(config: &ApiConfig, movie_id: u64) -> Result<Url, ApiError> {
    let mut url = parse_base(config, &["movie", &movie_id.to_string()])?;
    url.query_pairs_mut()
        .append_pair("api_key", &config.api_key)
        .append_pair("append_to_response", "credits");
    Ok(url)
}

fn parse_base(config: &ApiConfig, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = Url::parse(&config.base_url).map_err(|e| ApiError::Decode {
        message: format!("invalid base url {}: {e}", config.base_url),
    })?;
    {
        let mut path = url.path_segments_mut().map_err(|()| ApiError::Decode {
            message: format!("base url cannot carry a path: {}", config.base_url),
        })?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Collapse a raw HTTP outcome into the domain result an event carries.
pub fn into_api_result<T>(
    result: crux_http::Result<crux_http::Response<T>>,
) -> Result<T, ApiError> {
    let mut response = result.map_err(|e| ApiError::Network {
        message: e.to_string(),
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.into(),
        });
    }
    response.take_body().ok_or_else(|| ApiError::Decode {
        message: "response body missing".into(),
    })
}

/// Detail variant of [`into_api_result`]: a 404 means the movie itself
/// is gone, which the detail screen reports differently from a server
/// fault.
pub fn into_detail_result<T>(
    movie_id: u64,
    result: crux_http::Result<crux_http::Response<T>>,
) -> Result<T, ApiError> {
    match into_api_result(result) {
        Err(ApiError::Status { status: 404 }) => Err(ApiError::NotFound { id: movie_id }),
        other => other,
    }
}
