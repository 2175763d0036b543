//! Console commands and scheduled jobs of the agency back office.

pub mod commands;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod sync;
