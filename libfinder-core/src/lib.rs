//! Core library for the `libfinder` CLI and HTTP endpoint.
//!
//! This crate defines:
//! - Query classification and the postal-code / city search strategies
//! - Address component normalization and great-circle distance
//! - Abstraction over the geocoding and places lookups, with a Google client
//! - Configuration & credentials handling
//!
//! It is used by `libfinder-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod distance;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod search;

pub use config::{Config, ServerConfig};
pub use error::LookupError;
pub use model::{GeoPoint, LibraryResult, PlaceCandidate, PlaceDetail, Query, Rejection, SearchResponse};
pub use provider::{PlacesProvider, provider_from_config};
pub use search::LibraryFinder;
