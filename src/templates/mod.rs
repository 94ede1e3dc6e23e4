//! Built-in site templates using the Tera template engine
//!
//! Templates and static assets are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Files written to the output root on every build
pub const ASSETS: &[(&str, &str)] = &[
    ("styles.css", include_str!("site/assets/styles.css")),
    ("logo.svg", include_str!("site/assets/logo.svg")),
];

/// Browser side of the load-more button
pub const LISTING_SCRIPT: &str = include_str!("site/assets/listing.js");

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("fallback.html", include_str!("site/fallback.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/comments.html",
                include_str!("site/partials/comments.html"),
            ),
            (
                "partials/preview.html",
                include_str!("site/partials/preview.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub home_url: String,
    pub logo_url: String,
    pub styles_url: String,
}

/// A post card on the listing page
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub url: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub date_attr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub author: String,
    pub date: String,
    pub date_attr: String,
    pub banner_url: Option<String>,
    pub reading_minutes: usize,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,
    /// Pre-rendered, already escaped body
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsData {
    pub script: String,
    pub repo: String,
    pub issue_term: String,
    pub theme: String,
}

/// State handed to the load-more script
#[derive(Debug, Clone, Serialize)]
pub struct ListingScriptData {
    pub next_page: Option<String>,
    pub months: Vec<String>,
    pub post_base_url: String,
}

impl ListingScriptData {
    /// JSON safe to place inside a `<script>` element
    pub fn to_script_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }
}
