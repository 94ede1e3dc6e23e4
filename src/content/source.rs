//! Read-only interface to the content API

use async_trait::async_trait;

use super::query::{Predicate, QueryOptions};
use super::{ApiPage, ContentError, Document};

/// Where posts come from
///
/// Implementors only need `query` and `fetch_page`; the lookups the
/// pages use are built on top of them.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a search with every predicate applied
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<ApiPage, ContentError>;

    /// Follow a `next_page` cursor
    async fn fetch_page(&self, url: &str) -> Result<ApiPage, ContentError>;

    /// All documents of one custom type
    async fn query_by_type(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<ApiPage, ContentError> {
        self.query(&[Predicate::document_type(doc_type)], options)
            .await
    }

    /// First match only, `None` when nothing matches
    async fn query_first(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<Option<Document>, ContentError> {
        let options = options.clone().page_size(1);
        let page = self.query(predicates, &options).await?;
        Ok(page.results.into_iter().next())
    }

    /// Look up a document by uid
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        content_ref: Option<&str>,
    ) -> Result<Document, ContentError> {
        let options = QueryOptions::new().content_ref(content_ref);
        self.query_first(&[Predicate::uid(doc_type, uid)], &options)
            .await?
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
