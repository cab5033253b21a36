//! Feedlens HTTP server
//!
//! Axum API over the feedlens core: feedback ingestion, translation,
//! filtered listing and sentiment statistics.

pub mod api;
pub mod logging;
