pub mod gemini;
pub mod payload;
pub mod prompt;

pub use gemini::GeminiModel;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub mod prelude {
    pub use super::gemini::GeminiModel;
    pub use bd_core::{ArticleGenerator, Commentary, GeneratedArticle, Result};
}
