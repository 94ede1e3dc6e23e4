//! Home page listing and its load-more state
//!
//! The listing is a value, [`ListingState`], moved forward by
//! [`ListingState::apply`]. Loading more posts fetches the cursor and feeds
//! the result through the same transition, so the rendering code and the
//! browser script never mutate the list any other way.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentSource, PostPagination, PostSummary, QueryOptions};

/// Posts shown so far plus the cursor for the next batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingState {
    pub posts: Vec<PostSummary>,
    pub next_page: Option<String>,
}

impl ListingState {
    /// Seed the state from the first page
    pub fn initial(first: PostPagination) -> Self {
        Self::default().apply(first)
    }

    /// Append a fetched batch in arrival order and move the cursor
    ///
    /// Posts are not de-duplicated; the API never repeats a document
    /// across pages of the same query.
    ///
    /// The load-more button runs the same step in the browser
    /// (`templates/site/assets/listing.js`). A change here has to be made
    /// there too.
    pub fn apply(mut self, batch: PostPagination) -> Self {
        self.posts.extend(batch.results);
        self.next_page = batch.next_page;
        self
    }

    /// The "load more" control is shown exactly when this is true
    pub fn can_load_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the next batch and return the advanced state
    ///
    /// On the last page this returns an unchanged copy without touching
    /// the source. A failed fetch leaves `self` as it was, so the caller
    /// may simply try again.
    pub async fn load_more(&self, source: &dyn ContentSource) -> Result<Self, ContentError> {
        let Some(cursor) = self.next_page.as_deref() else {
            return Ok(self.clone());
        };

        tracing::debug!("Loading more posts ({} shown)", self.posts.len());
        let page = source.fetch_page(cursor).await?;
        let batch = PostPagination::from_api_page(&page)?;
        Ok(self.clone().apply(batch))
    }
}

/// Fields the listing needs from each post
pub fn listing_fields(doc_type: &str) -> Vec<String> {
    ["title", "subtitle", "author"]
        .iter()
        .map(|field| format!("{}.{}", doc_type, field))
        .collect()
}

/// Query the first page of posts for the home page
pub async fn load_first_page(
    source: &dyn ContentSource,
    config: &SiteConfig,
    content_ref: Option<&str>,
) -> Result<ListingState, ContentError> {
    let doc_type = &config.prismic.document_type;
    let options = QueryOptions::new()
        .fetch(listing_fields(doc_type))
        .page_size(config.listing.page_size.max(1))
        .content_ref(content_ref);

    let page = source.query_by_type(doc_type, &options).await?;
    let first = PostPagination::from_api_page(&page)?;
    tracing::info!(
        "Listing starts with {} of {} posts",
        first.results.len(),
        page.total_results_size
    );
    Ok(ListingState::initial(first))
}

/// Follow every cursor until the end of the listing
pub async fn load_all(
    source: &dyn ContentSource,
    config: &SiteConfig,
    content_ref: Option<&str>,
) -> Result<ListingState, ContentError> {
    let mut state = load_first_page(source, config, content_ref).await?;
    while state.can_load_more() {
        state = state.load_more(source).await?;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Document, MemorySource};
    use serde_json::json;

    fn summary(uid: &str) -> PostSummary {
        PostSummary {
            uid: uid.to_string(),
            first_publication_date: None,
            title: format!("Post {}", uid),
            subtitle: String::new(),
            author: "Ana".to_string(),
        }
    }

    fn batch(uids: &[&str], next: Option<&str>) -> PostPagination {
        PostPagination {
            next_page: next.map(str::to_string),
            results: uids.iter().map(|uid| summary(uid)).collect(),
        }
    }

    fn source(count: usize) -> MemorySource {
        let docs = (1..=count)
            .map(|i| {
                serde_json::from_value::<Document>(json!({
                    "id": format!("id{}", i),
                    "uid": format!("post-{}", i),
                    "type": "posts",
                    "first_publication_date": format!("2021-03-{:02}T10:00:00+0000", i),
                    "data": {
                        "title": format!("Post {}", i),
                        "subtitle": "sub",
                        "author": "Ana",
                        "content": []
                    }
                }))
                .unwrap()
            })
            .collect();
        MemorySource::new(docs)
    }

    fn uids(state: &ListingState) -> Vec<&str> {
        state.posts.iter().map(|p| p.uid.as_str()).collect()
    }

    #[test]
    fn test_apply_appends_and_moves_cursor() {
        let state = ListingState::initial(batch(&["a"], Some("c1")));
        assert!(state.can_load_more());

        let state = state.apply(batch(&["b", "c"], Some("c2")));
        assert_eq!(uids(&state), vec!["a", "b", "c"]);
        assert_eq!(state.next_page.as_deref(), Some("c2"));

        let state = state.apply(batch(&["d"], None));
        assert_eq!(uids(&state), vec!["a", "b", "c", "d"]);
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_apply_keeps_duplicates() {
        let state = ListingState::initial(batch(&["a"], Some("c1"))).apply(batch(&["a"], None));
        assert_eq!(uids(&state), vec!["a", "a"]);
    }

    #[tokio::test]
    async fn test_first_page_uses_configured_size() {
        let source = source(5);
        let mut config = SiteConfig::default();
        config.listing.page_size = 2;

        let state = load_first_page(&source, &config, None).await.unwrap();
        assert_eq!(uids(&state), vec!["post-1", "post-2"]);
        assert!(state.can_load_more());
        // only listing fields were requested
        assert_eq!(state.posts[0].subtitle, "sub");
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted() {
        let source = source(3);
        let config = SiteConfig::default();

        let mut state = load_first_page(&source, &config, None).await.unwrap();
        let mut batches = vec![uids(&state).len()];
        while state.can_load_more() {
            state = state.load_more(&source).await.unwrap();
            batches.push(state.posts.len());
        }

        assert_eq!(batches, vec![1, 2, 3]);
        assert_eq!(uids(&state), vec!["post-1", "post-2", "post-3"]);
        assert_eq!(source.request_count(), 3);

        // no fetch once the cursor is gone
        let again = state.load_more(&source).await.unwrap();
        assert_eq!(again, state);
        assert_eq!(source.request_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_load_more_keeps_state() {
        let source = source(1);
        let state = ListingState::initial(batch(&["a"], Some("memory://search/42/2")));

        let result = state.load_more(&source).await;
        assert!(result.is_err());
        assert_eq!(uids(&state), vec!["a"]);
        assert!(state.can_load_more());
    }

    #[tokio::test]
    async fn test_load_all() {
        let source = source(4);
        let state = load_all(&source, &SiteConfig::default(), None).await.unwrap();
        assert_eq!(state.posts.len(), 4);
        assert!(state.next_page.is_none());
    }

    #[test]
    fn test_browser_script_appends_and_moves_cursor() {
        let script = crate::templates::LISTING_SCRIPT;
        // Append in arrival order
        assert!(script.contains("(page.results || []).forEach"));
        assert!(script.contains("list.appendChild(card(doc))"));
        // Replace the cursor, drop the control once it is gone
        assert!(script.contains("nextPage = page.next_page;"));
        assert!(script.contains("if (!nextPage) button.remove();"));
        // A failed fetch keeps the cursor for a retry
        assert!(script.contains(".catch("));
    }

    #[test]
    fn test_listing_fields() {
        assert_eq!(
            listing_fields("posts"),
            vec!["posts.title", "posts.subtitle", "posts.author"]
        );
    }
}
