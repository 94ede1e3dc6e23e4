//! In-memory content source backed by a fixture file

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use super::query::{OrderBy, Predicate, QueryOptions, DOCUMENT_TYPE, PUBLICATION_DATE};
use super::{ApiPage, ContentError, ContentSource, Document};

/// Scheme of the cursors handed out by [`MemorySource`]
const CURSOR_PREFIX: &str = "memory://search/";

/// Page size the search endpoint uses when none is requested
const DEFAULT_PAGE_SIZE: usize = 20;

/// Result sets kept for cursor lookups; older cursors stop resolving
const MAX_RESULT_SETS: usize = 64;

/// Serves a fixed set of documents with the same query semantics as the API
///
/// Without orderings, documents come back in the order they were given.
/// Content refs are accepted and ignored: there is only one version.
/// Cursors point at the most recent result sets only.
pub struct MemorySource {
    documents: Vec<Document>,
    result_sets: Mutex<ResultSets>,
    requests: AtomicUsize,
}

struct ResultSet {
    id: usize,
    documents: Vec<Document>,
    page_size: usize,
}

#[derive(Default)]
struct ResultSets {
    next_id: usize,
    sets: VecDeque<ResultSet>,
}

impl ResultSets {
    fn push(&mut self, documents: Vec<Document>, page_size: usize) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        if self.sets.len() >= MAX_RESULT_SETS {
            self.sets.pop_front();
        }
        self.sets.push_back(ResultSet {
            id,
            documents,
            page_size,
        });
        id
    }

    fn get(&self, id: usize) -> Option<&ResultSet> {
        self.sets.iter().find(|set| set.id == id)
    }
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            result_sets: Mutex::new(ResultSets::default()),
            requests: AtomicUsize::new(0),
        }
    }

    /// Load a JSON array of documents
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let content = fs::read_to_string(path.as_ref())?;
        let documents: Vec<Document> = serde_json::from_str(&content)?;
        tracing::info!(
            "Loaded {} documents from {:?}",
            documents.len(),
            path.as_ref()
        );
        Ok(Self::new(documents))
    }

    /// Number of queries and page fetches served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(AtomicOrdering::SeqCst)
    }

    fn page(&self, set_id: usize, page: u32) -> Option<ApiPage> {
        let sets = self.result_sets.lock().unwrap_or_else(|e| e.into_inner());
        let set = sets.get(set_id)?;

        let total = set.documents.len();
        let total_pages = total.div_ceil(set.page_size) as u32;
        if page == 0 || (page > total_pages && page > 1) {
            return None;
        }

        let start = (page as usize - 1) * set.page_size;
        let results = set
            .documents
            .iter()
            .skip(start)
            .take(set.page_size)
            .cloned()
            .collect();

        Some(ApiPage {
            page,
            results_per_page: set.page_size,
            total_results_size: total,
            total_pages,
            next_page: (page < total_pages).then(|| cursor(set_id, page + 1)),
            prev_page: (page > 1).then(|| cursor(set_id, page - 1)),
            results,
        })
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<ApiPage, ContentError> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);

        let mut documents: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| predicates.iter().all(|p| matches(doc, p)))
            .map(|doc| select_fields(doc, &options.fetch))
            .collect();

        if !options.orderings.is_empty() {
            documents.sort_by(|a, b| {
                options
                    .orderings
                    .iter()
                    .map(|order| compare(a, b, order))
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let set_id = self
            .result_sets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(
                documents,
                options.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
            );

        self.page(set_id, 1).ok_or_else(|| ContentError::Status {
            status: 404,
            url: cursor(set_id, 1),
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<ApiPage, ContentError> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);

        let not_found = || ContentError::Status {
            status: 404,
            url: url.to_string(),
        };
        let (set_id, page) = url
            .strip_prefix(CURSOR_PREFIX)
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(not_found)?;
        let set_id: usize = set_id.parse().map_err(|_| not_found())?;
        let page: u32 = page.parse().map_err(|_| not_found())?;

        self.page(set_id, page).ok_or_else(not_found)
    }
}

fn cursor(set_id: usize, page: u32) -> String {
    format!("{}{}/{}", CURSOR_PREFIX, set_id, page)
}

/// Value of a string field addressed by predicate path
fn field<'a>(doc: &'a Document, path: &str) -> Option<&'a str> {
    match path {
        DOCUMENT_TYPE => Some(&doc.doc_type),
        "document.id" => Some(&doc.id),
        _ => {
            let rest = path.strip_prefix("my.")?;
            let (doc_type, name) = rest.split_once('.')?;
            if doc_type != doc.doc_type {
                return None;
            }
            if name == "uid" {
                doc.uid.as_deref()
            } else {
                doc.data.get(name)?.as_str()
            }
        }
    }
}

fn date_field(doc: &Document, path: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    match path {
        PUBLICATION_DATE => doc.first_publication_date,
        "document.last_publication_date" => doc.last_publication_date,
        _ => None,
    }
}

fn matches(doc: &Document, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::At { path, value } => field(doc, path) == Some(value.as_str()),
        Predicate::DateBefore { path, date } => date_field(doc, path).is_some_and(|d| d < *date),
        Predicate::DateAfter { path, date } => date_field(doc, path).is_some_and(|d| d > *date),
    }
}

/// Compare on one ordering key; documents missing the key sort last
fn compare(a: &Document, b: &Document, order: &OrderBy) -> Ordering {
    let ord = if order.field.starts_with("document.") && order.field.ends_with("_date") {
        match (date_field(a, &order.field), date_field(b, &order.field)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    } else {
        match (field(a, &order.field), field(b, &order.field)) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    };

    if order.descending {
        ord.reverse()
    } else {
        ord
    }
}

/// Keep only the `data` fields named in `fetch` (`posts.title` -> `title`)
fn select_fields(doc: &Document, fetch: &[String]) -> Document {
    let mut doc = doc.clone();
    if fetch.is_empty() {
        return doc;
    }

    let prefix = format!("{}.", doc.doc_type);
    if let serde_json::Value::Object(map) = &mut doc.data {
        map.retain(|key, _| {
            fetch
                .iter()
                .any(|f| f.strip_prefix(&prefix) == Some(key.as_str()))
        });
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(uid: &str, date: Option<&str>) -> Document {
        serde_json::from_value(json!({
            "id": format!("id-{}", uid),
            "uid": uid,
            "type": "posts",
            "first_publication_date": date,
            "data": { "title": format!("Title {}", uid), "author": "Ana" }
        }))
        .unwrap()
    }

    fn source() -> MemorySource {
        MemorySource::new(vec![
            doc("b", Some("2021-03-20T10:00:00+0000")),
            doc("a", Some("2021-03-10T10:00:00+0000")),
            doc("c", Some("2021-03-30T10:00:00+0000")),
            doc("draft", None),
        ])
    }

    fn uids(page: &ApiPage) -> Vec<&str> {
        page.results.iter().map(|d| d.slug()).collect()
    }

    #[tokio::test]
    async fn test_query_by_type_paginates() {
        let source = source();
        let options = QueryOptions::new().page_size(3);
        let first = source.query_by_type("posts", &options).await.unwrap();
        assert_eq!(uids(&first), vec!["b", "a", "c"]);
        assert_eq!(first.total_pages, 2);

        let next = first.next_page.clone().unwrap();
        let second = source.fetch_page(&next).await.unwrap();
        assert_eq!(uids(&second), vec!["draft"]);
        assert!(second.next_page.is_none());
        assert_eq!(second.prev_page.as_deref(), Some(cursor(0, 1).as_str()));
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_orderings() {
        let source = source();
        let options = QueryOptions::new().order_by(OrderBy::desc(PUBLICATION_DATE));
        let page = source.query(&[], &options).await.unwrap();
        assert_eq!(uids(&page), vec!["c", "b", "a", "draft"]);

        let options = QueryOptions::new().order_by(OrderBy::asc(PUBLICATION_DATE));
        let page = source.query(&[], &options).await.unwrap();
        assert_eq!(uids(&page), vec!["a", "b", "c", "draft"]);
    }

    #[tokio::test]
    async fn test_date_predicates_are_strict() {
        let source = source();
        let pivot = chrono::DateTime::parse_from_rfc3339("2021-03-20T10:00:00+00:00").unwrap();

        let before = source
            .query(&[Predicate::date_before(PUBLICATION_DATE, pivot)], &QueryOptions::new())
            .await
            .unwrap();
        assert_eq!(uids(&before), vec!["a"]);

        let after = source
            .query(&[Predicate::date_after(PUBLICATION_DATE, pivot)], &QueryOptions::new())
            .await
            .unwrap();
        assert_eq!(uids(&after), vec!["c"]);
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let source = source();
        let found = source.get_by_uid("posts", "a", None).await.unwrap();
        assert_eq!(found.id, "id-a");

        let missing = source.get_by_uid("posts", "nope", None).await.unwrap_err();
        assert!(missing.is_not_found());

        // uid lookups are scoped to the custom type
        let other_type = source.get_by_uid("pages", "a", None).await.unwrap_err();
        assert!(other_type.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_selects_fields() {
        let source = source();
        let options = QueryOptions::new().fetch(["posts.title"]);
        let page = source.query_by_type("posts", &options).await.unwrap();
        let data = page.results[0].data.as_object().unwrap();
        assert!(data.contains_key("title"));
        assert!(!data.contains_key("author"));
    }

    #[tokio::test]
    async fn test_empty_result_and_bad_cursor() {
        let source = source();
        let page = source.query_by_type("pages", &QueryOptions::new()).await.unwrap();
        assert!(page.results.is_empty());
        assert!(page.next_page.is_none());

        assert!(source.fetch_page("memory://search/99/1").await.is_err());
        assert!(source.fetch_page("https://example.com").await.is_err());
    }

    #[tokio::test]
    async fn test_result_sets_stay_bounded() {
        let source = source();
        let options = QueryOptions::new().page_size(1);
        let first = source.query_by_type("posts", &options).await.unwrap();
        let stale = first.next_page.unwrap();

        for _ in 0..1000 {
            source.get_by_uid("posts", "a", None).await.unwrap();
        }
        let kept = source
            .result_sets
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sets
            .len();
        assert_eq!(kept, MAX_RESULT_SETS);

        // The oldest cursor was evicted, a fresh one still works
        assert!(source.fetch_page(&stale).await.is_err());
        let recent = source.query_by_type("posts", &options).await.unwrap();
        let second = source.fetch_page(&recent.next_page.unwrap()).await.unwrap();
        assert_eq!(uids(&second), vec!["a"]);
    }

    #[test]
    fn test_load_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let docs = vec![doc("a", Some("2021-03-10T10:00:00+0000"))];
        fs::write(&path, serde_json::to_string(&docs).unwrap()).unwrap();

        let source = MemorySource::load(&path).unwrap();
        assert_eq!(source.documents, docs);
        assert_eq!(source.request_count(), 0);
    }
}
