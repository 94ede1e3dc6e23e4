//! headless-blog: a static blog frontend for a headless CMS
//!
//! Posts live in a Prismic repository. This crate queries them, renders the
//! home listing and the most recent post pages with embedded Tera templates,
//! and serves the output with on-demand generation of the remaining posts.

pub mod commands;
pub mod config;
pub mod content;
pub mod detail;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentSource, MemorySource, PrismicClient};

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Files copied verbatim to the output
    pub static_dir: PathBuf,
}

impl Blog {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            let mut config = config::SiteConfig::default();
            config.apply_env();
            config
        };

        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        })
    }

    /// Interface strings for the site language, with overrides from `languages/`
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::builtin(&self.config.language);
        i18n.load_languages(self.base_dir.join("languages"))?;
        Ok(i18n)
    }

    /// Open the content repository
    ///
    /// With `fixtures`, documents are read from a local JSON file instead
    /// of the configured Prismic endpoint.
    pub fn content_source(&self, fixtures: Option<&Path>) -> Result<Arc<dyn ContentSource>> {
        match fixtures {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.base_dir.join(path)
                };
                tracing::info!("Reading posts from {:?}", path);
                Ok(Arc::new(MemorySource::load(&path)?))
            }
            None => {
                if self.config.prismic.endpoint.is_empty() {
                    anyhow::bail!("prismic.endpoint is not set in _config.yml");
                }
                Ok(Arc::new(PrismicClient::new(&self.config.prismic)?))
            }
        }
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
