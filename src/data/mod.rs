//! Distance Matrix data types and API client
//!
//! This module holds the request options, the response view and the client
//! that ties them to the HTTP transport and the response cache.

pub mod client;
pub mod options;
pub mod response;
pub mod transport;

pub use client::{DistanceMatrixClient, Locations, CACHE_PREFIX};
pub use options::{
    Avoid, DepartureTime, Language, RequestOptions, TrafficModel, TravelMode, Units,
};
pub use response::{DistanceRecord, Element, ElementStatus, MatrixResponse, TextValue};
pub use transport::{HttpTransport, Transport, DISTANCE_MATRIX_URL};

use thiserror::Error;

/// Errors that can occur when calculating a distance matrix
///
/// All of them end the call; nothing is retried inside the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An option value was not recognized
    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidOption { option: &'static str, value: String },

    /// The HTTP layer failed (connection, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The body was not the expected JSON
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-OK top-level status
    #[error("Distance Matrix API returned {code}{}", describe(.message))]
    ApiStatus {
        code: String,
        message: Option<String>,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

fn describe(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {}", message),
        None => String::new(),
    }
}
