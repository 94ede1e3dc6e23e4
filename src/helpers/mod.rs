//! Helper functions for templates
//!
//! Date formatting, URL generation and HTML rendering used while
//! building the template context.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;

use chrono::{DateTime, FixedOffset};

use crate::config::SiteConfig;

/// Helpers bound to one site configuration
#[derive(Debug, Clone)]
pub struct Helpers {
    config: SiteConfig,
    tz: chrono_tz::Tz,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        let tz = config.tz();
        Self { config, tz }
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// URL of a post page
    pub fn post_url(&self, slug: &str) -> String {
        url_for(&self.config, &post_path(slug))
    }

    /// Format a publication date with the site pattern and timezone
    pub fn date(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        publication_date(date, &self.tz, Some(&self.config.date_format))
    }

    /// `datetime` attribute for a publication date
    pub fn date_attr(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        date.map(|d| date_xml(&d.with_timezone(&self.tz)))
            .unwrap_or_default()
    }
}
