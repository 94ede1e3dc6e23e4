//! Content module - documents from the CMS and the post models built from them

mod document;
mod error;
pub mod memory;
mod post;
pub mod prismic;
pub mod query;
mod source;

pub use document::{ApiPage, Document};
pub use error::ContentError;
pub use memory::MemorySource;
pub use post::{
    ClosestPost, ContentSection, PostDetail, PostPagination, PostSummary, RichTextBlock, Span,
    SpanData,
};
pub use prismic::PrismicClient;
pub use query::{OrderBy, Predicate, QueryOptions};
pub use source::ContentSource;
