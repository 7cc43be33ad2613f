//! Doubles team generation and round/court scheduling for multi-court sessions.
//!
//! The engine in [`matching`] turns a validated [`config::MatchingConfig`] into a
//! [`matching::MatchingResult`]. The remaining modules are the hosting glue: roster
//! loading, validation, text/CSV output and the web surface.

pub mod config;
pub mod demo;
pub mod display;
pub mod error;
pub mod export;
pub mod matching;
pub mod parser;
pub mod web;

pub use config::{load_config, MatchingConfig, MatchingOptions};
pub use error::{ConfigError, RosterError};
pub use matching::{generate_matching, MatchingResult};
