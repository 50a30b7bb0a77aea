//! Core domain + application logic for the reaction tally bot.
//!
//! This crate is framework-agnostic. The chat platform lives behind the
//! `ChatPort` trait, implemented in adapter crates.

pub mod bot;
pub mod classifier;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod scoreboard;

pub use errors::{Error, Result};
