//! Domain logic for the agency back office.
//!
//! This crate has no internal dependencies: it holds the workflow tables,
//! money maths, numbering and synchronization rules shared by the `db`,
//! `google` and `worker` crates.

pub mod error;
pub mod keyword;
pub mod line_item;
pub mod money;
pub mod numbering;
pub mod review;
pub mod seo;
pub mod status_rules;
pub mod sync;
pub mod totals;
pub mod types;
pub mod workflow;
