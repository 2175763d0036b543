//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod devis_repo;
pub mod document_sequence_repo;
pub mod facture_repo;
pub mod google_review_repo;
pub mod prospect_repo;
pub mod seo_keyword_repo;
pub mod seo_position_repo;
pub mod sync_state_repo;

pub use client_repo::ClientRepo;
pub use devis_repo::DevisRepo;
pub use document_sequence_repo::DocumentSequenceRepo;
pub use facture_repo::FactureRepo;
pub use google_review_repo::GoogleReviewRepo;
pub use prospect_repo::ProspectRepo;
pub use seo_keyword_repo::SeoKeywordRepo;
pub use seo_position_repo::SeoPositionRepo;
pub use sync_state_repo::SyncStateRepo;
