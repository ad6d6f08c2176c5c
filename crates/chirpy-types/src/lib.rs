//! Wire types for the chirpy HTTP API.
//!
//! Kept separate from the `chirpy-db` models so the persisted document and
//! the JSON bodies clients see can evolve independently.
pub mod api;
