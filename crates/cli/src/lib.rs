//! Terminal client for Traveler's Tale sessions.

pub mod cli;
pub mod commands;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod styles;
