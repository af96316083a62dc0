pub mod error;
pub mod feed;
pub mod generate;
pub mod store;
pub mod types;

pub use error::Error;
pub use feed::FeedSource;
pub use generate::ArticleGenerator;
pub use store::DraftStore;
pub use types::{
    plain_text, Block, Commentary, DraftSection, FeedItem, GeneratedArticle, MarkDef, SavedDraft,
    Span, StoredPost,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{
        Block, DraftSection, Error, FeedItem, GeneratedArticle, Result, SavedDraft, Span,
        StoredPost,
    };
    pub use super::{ArticleGenerator, DraftStore, FeedSource};
}
