//! Song recommendation service.
//!
//! Songs are turned into two feature spaces (tf-idf over genre/artist/year
//! text and standardized audio attributes), ranked by blended cosine
//! similarity, and served through content, genre, popularity and hybrid
//! personalized strategies over an axum API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
