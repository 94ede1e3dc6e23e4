//! Query predicates and options for the search endpoint

use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Field path of the publication timestamp
pub const PUBLICATION_DATE: &str = "document.first_publication_date";

/// Field path of the document type
pub const DOCUMENT_TYPE: &str = "document.type";

/// A single filter on the search endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals value
    At { path: String, value: String },
    /// Date field strictly before the given instant
    DateBefore {
        path: String,
        date: DateTime<FixedOffset>,
    },
    /// Date field strictly after the given instant
    DateAfter {
        path: String,
        date: DateTime<FixedOffset>,
    },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    pub fn document_type(doc_type: &str) -> Self {
        Self::at(DOCUMENT_TYPE, doc_type)
    }

    /// Match a custom type by uid (`my.posts.uid`)
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(&format!("my.{}.uid", doc_type), uid)
    }

    pub fn date_before(path: &str, date: DateTime<FixedOffset>) -> Self {
        Predicate::DateBefore {
            path: path.to_string(),
            date,
        }
    }

    pub fn date_after(path: &str, date: DateTime<FixedOffset>) -> Self {
        Predicate::DateAfter {
            path: path.to_string(),
            date,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({}, \"{}\")]", path, value.replace('"', "\\\""))
            }
            // Dates go over the wire as epoch milliseconds
            Predicate::DateBefore { path, date } => {
                write!(f, "[date.before({}, {})]", path, date.timestamp_millis())
            }
            Predicate::DateAfter { path, date } => {
                write!(f, "[date.after({}, {})]", path, date.timestamp_millis())
            }
        }
    }
}

/// Render predicates as the `q` query parameter
pub fn query_string(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner)
}

/// Sort key for search results
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "{} desc", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Search options shared by every query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Restrict returned `data` to these fields (`posts.title`, ...)
    pub fetch: Vec<String>,
    pub page_size: Option<usize>,
    pub orderings: Vec<OrderBy>,
    /// Content version; the master ref is used when unset
    pub content_ref: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn order_by(mut self, ordering: OrderBy) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn content_ref(mut self, content_ref: Option<&str>) -> Self {
        self.content_ref = content_ref.map(str::to_string);
        self
    }

    /// The `orderings` query parameter, if any
    pub fn orderings_param(&self) -> Option<String> {
        if self.orderings.is_empty() {
            return None;
        }
        let keys: Vec<String> = self.orderings.iter().map(|o| o.to_string()).collect();
        Some(format!("[{}]", keys.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_syntax() {
        assert_eq!(
            Predicate::document_type("posts").to_string(),
            r#"[at(document.type, "posts")]"#
        );
        assert_eq!(
            Predicate::uid("posts", "my-post").to_string(),
            r#"[at(my.posts.uid, "my-post")]"#
        );

        let date = DateTime::parse_from_rfc3339("2021-03-15T19:25:28+00:00").unwrap();
        assert_eq!(
            Predicate::date_before(PUBLICATION_DATE, date).to_string(),
            "[date.before(document.first_publication_date, 1615836328000)]"
        );
        assert_eq!(
            Predicate::date_after(PUBLICATION_DATE, date).to_string(),
            "[date.after(document.first_publication_date, 1615836328000)]"
        );
    }

    #[test]
    fn test_query_string() {
        let q = query_string(&[
            Predicate::document_type("posts"),
            Predicate::at("document.id", "a\"b"),
        ]);
        assert_eq!(
            q,
            r#"[[at(document.type, "posts")][at(document.id, "a\"b")]]"#
        );
    }

    #[test]
    fn test_orderings_param() {
        assert_eq!(QueryOptions::new().orderings_param(), None);

        let options = QueryOptions::new()
            .order_by(OrderBy::desc(PUBLICATION_DATE))
            .order_by(OrderBy::asc("my.posts.title"));
        assert_eq!(
            options.orderings_param().unwrap(),
            "[document.first_publication_date desc,my.posts.title]"
        );
    }

    #[test]
    fn test_builder() {
        let options = QueryOptions::new()
            .fetch(["posts.title", "posts.author"])
            .page_size(2)
            .content_ref(Some("preview-ref"));
        assert_eq!(options.fetch, vec!["posts.title", "posts.author"]);
        assert_eq!(options.page_size, Some(2));
        assert_eq!(options.content_ref.as_deref(), Some("preview-ref"));
    }
}
