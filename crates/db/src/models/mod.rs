//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod client;
pub mod devis;
pub mod facture;
pub mod google_review;
pub mod prospect;
pub mod seo;
pub mod sync_state;
