//! Finds the aircraft closest to an observer in a live flight feed and
//! describes it using static airline, aircraft type and airport tables.

pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod locator;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod server;
