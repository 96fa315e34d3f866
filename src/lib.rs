//! distmatrix library
//!
//! Google Distance Matrix client with response caching, plus the pieces the
//! command-line front end is built from.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod render;

pub use cache::{CacheManager, CacheStore, MemoryCache};
pub use config::{ClientConfig, Settings};
pub use data::{ApiError, DistanceMatrixClient, MatrixResponse, RequestOptions};
