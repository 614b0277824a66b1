//! API client library for movieapp.
//!
//! Provides a typed client for the TMDB v3 movie endpoints.

/// TMDB API client.
pub mod tmdb;
