pub mod client;
pub mod slug;
pub mod store;

pub use client::{SanityClient, SanityConfig};
pub use store::{build_draft_document, sections_to_blocks, SanityStore};

pub mod prelude {
    pub use super::{SanityClient, SanityConfig, SanityStore};
    pub use bd_core::{DraftStore, Result, SavedDraft, StoredPost};
}
