//! Post models projected from CMS documents

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::document::{api_date, nullable, ApiPage, Document};
use super::ContentError;

/// A post as shown on the listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    #[serde(with = "api_date")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    pub fn from_document(doc: &Document) -> Result<Self, ContentError> {
        let fields: PostFields = doc.data_as()?;
        Ok(Self {
            uid: doc.slug().to_string(),
            first_publication_date: doc.first_publication_date,
            title: fields.title,
            subtitle: fields.subtitle,
            author: fields.author,
        })
    }
}

/// A full post with its content sections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub content: Vec<ContentSection>,
}

impl PostDetail {
    pub fn from_document(doc: &Document) -> Result<Self, ContentError> {
        let fields: PostFields = doc.data_as()?;
        Ok(Self {
            uid: doc.slug().to_string(),
            first_publication_date: doc.first_publication_date,
            title: fields.title,
            subtitle: fields.subtitle,
            author: fields.author,
            banner_url: fields.banner.url.filter(|url| !url.is_empty()),
            content: fields.content,
        })
    }

    /// Whitespace-separated words across every heading and body block
    pub fn word_count(&self) -> usize {
        self.content
            .iter()
            .map(|section| {
                count_words(&section.heading)
                    + section
                        .body
                        .iter()
                        .map(|block| count_words(&block.text))
                        .sum::<usize>()
            })
            .sum()
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A chronologically adjacent post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosestPost {
    pub uid: String,
    pub title: String,
}

impl ClosestPost {
    pub fn from_document(doc: &Document) -> Result<Self, ContentError> {
        let fields: PostFields = doc.data_as()?;
        Ok(Self {
            uid: doc.slug().to_string(),
            title: fields.title,
        })
    }
}

/// A page of posts plus the cursor for the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub results: Vec<PostSummary>,
}

impl PostPagination {
    pub fn from_api_page(page: &ApiPage) -> Result<Self, ContentError> {
        let results = page
            .results
            .iter()
            .map(PostSummary::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            next_page: page.next_page.clone(),
            results,
        })
    }
}

/// A titled group of rich-text blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default, deserialize_with = "nullable")]
    pub heading: String,
    #[serde(default, deserialize_with = "nullable")]
    pub body: Vec<RichTextBlock>,
}

/// One structured-text block (paragraph, heading, list item, image...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub spans: Vec<Span>,
    /// Set on image blocks
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl RichTextBlock {
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
        }
    }
}

/// Inline formatting over a character range of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: SpanData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Fields of the `posts` custom type
#[derive(Debug, Default, Deserialize)]
struct PostFields {
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    subtitle: String,
    #[serde(default, deserialize_with = "nullable")]
    author: String,
    #[serde(default, deserialize_with = "nullable")]
    banner: Banner,
    #[serde(default, deserialize_with = "nullable")]
    content: Vec<ContentSection>,
}

#[derive(Debug, Default, Deserialize)]
struct Banner {
    #[serde(default)]
    url: Option<String>,
}
