//! Console commands of the `agence-worker` binary.

pub mod invoice;
pub mod seo_sync;
pub mod transition;
pub mod update_status;
