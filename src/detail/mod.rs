//! Post page data: the post itself, its neighbours and reading time

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::query::PUBLICATION_DATE;
use crate::content::{
    ClosestPost, ContentError, ContentSource, OrderBy, PostDetail, Predicate, QueryOptions,
};

/// Everything a post page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub post: PostDetail,
    pub previous: Option<ClosestPost>,
    pub next: Option<ClosestPost>,
    pub reading_minutes: usize,
    /// Preview ref the page was built from, if any
    pub content_ref: Option<String>,
}

/// Minutes to read `words`, rounded up
///
/// Empty posts take zero minutes; anything else at least one.
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1))
}

/// Resolve a post by slug with its previous and next posts
///
/// Fails with [`ContentError::NotFound`] when no post has this slug.
pub async fn resolve(
    source: &dyn ContentSource,
    config: &SiteConfig,
    slug: &str,
    content_ref: Option<&str>,
) -> Result<PostPage, ContentError> {
    let doc_type = &config.prismic.document_type;

    let doc = source.get_by_uid(doc_type, slug, content_ref).await?;
    let post = PostDetail::from_document(&doc)?;

    let (previous, next) = match post.first_publication_date {
        Some(date) => {
            let previous = closest(
                source,
                doc_type,
                Predicate::date_before(PUBLICATION_DATE, date),
                OrderBy::desc(PUBLICATION_DATE),
                content_ref,
            )
            .await?;
            let next = closest(
                source,
                doc_type,
                Predicate::date_after(PUBLICATION_DATE, date),
                OrderBy::asc(PUBLICATION_DATE),
                content_ref,
            )
            .await?;
            (previous, next)
        }
        None => (None, None),
    };

    let reading_minutes = reading_time(post.word_count(), config.detail.words_per_minute);
    tracing::debug!(
        "Resolved post {} ({} min, previous: {:?}, next: {:?})",
        slug,
        reading_minutes,
        previous.as_ref().map(|p| &p.uid),
        next.as_ref().map(|p| &p.uid)
    );

    Ok(PostPage {
        post,
        previous,
        next,
        reading_minutes,
        content_ref: content_ref.map(str::to_string),
    })
}

async fn closest(
    source: &dyn ContentSource,
    doc_type: &str,
    predicate: Predicate,
    order: OrderBy,
    content_ref: Option<&str>,
) -> Result<Option<ClosestPost>, ContentError> {
    let options = QueryOptions::new()
        .order_by(order)
        .content_ref(content_ref);
    let predicates = [Predicate::document_type(doc_type), predicate];

    match source.query_first(&predicates, &options).await? {
        Some(doc) => Ok(Some(ClosestPost::from_document(&doc)?)),
        None => Ok(None),
    }
}

/// Slugs of the most recent posts, rendered ahead of time
pub async fn static_paths(
    source: &dyn ContentSource,
    config: &SiteConfig,
) -> Result<Vec<String>, ContentError> {
    let limit = config.detail.prebuild_count;
    if limit == 0 {
        return Ok(Vec::new());
    }

    let options = QueryOptions::new()
        .order_by(OrderBy::desc(PUBLICATION_DATE))
        .page_size(limit);
    let page = source
        .query_by_type(&config.prismic.document_type, &options)
        .await?;

    Ok(page
        .results
        .iter()
        .take(limit)
        .map(|doc| doc.slug().to_string())
        .collect())
}
