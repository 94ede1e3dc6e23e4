//! Generator module - renders the listing and post pages to static HTML

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;
use walkdir::WalkDir;

use crate::content::ContentSource;
use crate::detail::{self, PostPage};
use crate::helpers::{self, Helpers};
use crate::i18n::I18n;
use crate::listing::{self, ListingState};
use crate::templates::{
    CommentsData, ListingScriptData, NavPost, PostCard, PostView, SectionView, SiteData,
    TemplateRenderer, ASSETS, LISTING_SCRIPT,
};
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    helpers: Helpers,
    i18n: I18n,
}

/// What a build produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateReport {
    pub listed_posts: usize,
    pub post_pages: Vec<String>,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let helpers = Helpers::new(blog.config.clone());
        let i18n = blog.i18n()?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            helpers,
            i18n,
        })
    }

    /// Generate the listing page and the pre-built post pages
    pub async fn generate(
        &self,
        source: &dyn ContentSource,
        content_ref: Option<&str>,
    ) -> Result<GenerateReport> {
        // Ensure public directory exists
        fs::create_dir_all(&self.blog.public_dir)?;

        self.write_assets()?;
        self.copy_static_files()?;

        let state = listing::load_first_page(source, &self.blog.config, content_ref).await?;
        let html = self.render_index(&state, content_ref.is_some())?;
        write_file(&self.blog.public_dir.join("index.html"), &html)?;
        tracing::info!("Generated index with {} posts", state.posts.len());

        let mut report = GenerateReport {
            listed_posts: state.posts.len(),
            post_pages: Vec::new(),
        };

        for slug in detail::static_paths(source, &self.blog.config).await? {
            if !helpers::is_valid_slug(&slug) {
                tracing::warn!("Skipping post with unusable slug {:?}", slug);
                continue;
            }
            match detail::resolve(source, &self.blog.config, &slug, content_ref).await {
                Ok(page) => {
                    self.write_post(&page)?;
                    report.post_pages.push(slug);
                }
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Skipping {}: {}", slug, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        write_file(
            &self.blog.public_dir.join("404.html"),
            &self.render_not_found()?,
        )?;

        tracing::info!("Generated {} post pages", report.post_pages.len());
        Ok(report)
    }

    /// Where a post page lives in the output directory
    pub fn post_output_path(&self, slug: &str) -> PathBuf {
        self.blog
            .public_dir
            .join(helpers::post_path(slug))
            .join("index.html")
    }

    /// Render and write one post page
    pub fn write_post(&self, page: &PostPage) -> Result<PathBuf> {
        let html = self.render_post(page)?;
        let output_path = self.post_output_path(&page.post.uid);
        write_file(&output_path, &html)?;
        tracing::debug!("Generated post: {:?}", output_path);
        Ok(output_path)
    }

    /// Render the listing page
    pub fn render_index(&self, state: &ListingState, preview: bool) -> Result<String> {
        let posts: Vec<PostCard> = state
            .posts
            .iter()
            .map(|p| PostCard {
                url: self.helpers.post_url(&p.uid),
                title: p.title.clone(),
                subtitle: p.subtitle.clone(),
                author: p.author.clone(),
                date: self.helpers.date(p.first_publication_date.as_ref()),
                date_attr: self.helpers.date_attr(p.first_publication_date.as_ref()),
            })
            .collect();

        let script_data = ListingScriptData {
            next_page: state.next_page.clone(),
            months: helpers::month_abbreviations(),
            post_base_url: self.helpers.url_for("post/"),
        };

        let mut context = self.create_base_context();
        context.insert("posts", &posts);
        context.insert("can_load_more", &state.can_load_more());
        context.insert("listing_json", &script_data.to_script_json()?);
        context.insert("listing_script", LISTING_SCRIPT);
        context.insert("preview", &preview);

        self.renderer.render("index.html", &context)
    }

    /// Render a post page
    pub fn render_post(&self, page: &PostPage) -> Result<String> {
        let post = &page.post;
        let view = PostView {
            title: post.title.clone(),
            author: post.author.clone(),
            date: self.helpers.date(post.first_publication_date.as_ref()),
            date_attr: self.helpers.date_attr(post.first_publication_date.as_ref()),
            banner_url: post.banner_url.clone(),
            reading_minutes: page.reading_minutes,
            sections: post
                .content
                .iter()
                .map(|section| SectionView {
                    heading: section.heading.clone(),
                    html: helpers::rich_text_to_html(&section.body),
                })
                .collect(),
        };

        let nav = |p: &crate::content::ClosestPost| NavPost {
            title: p.title.clone(),
            url: self.helpers.post_url(&p.uid),
        };
        let previous = page.previous.as_ref().map(nav);
        let next = page.next.as_ref().map(nav);

        let comments_config = &self.blog.config.comments;
        let comments = (comments_config.enable && !comments_config.repo.is_empty()).then(|| {
            CommentsData {
                script: comments_config.script.clone(),
                repo: comments_config.repo.clone(),
                issue_term: comments_config.issue_term.clone(),
                theme: comments_config.theme.clone(),
            }
        });

        let mut context = self.create_base_context();
        context.insert("post", &view);
        context.insert("previous", &previous);
        context.insert("next", &next);
        context.insert("comments", &comments);
        context.insert("preview", &page.content_ref.is_some());

        self.renderer.render("post.html", &context)
    }

    /// Placeholder shown while a post page is generated on request
    pub fn render_fallback(&self) -> Result<String> {
        self.renderer
            .render("fallback.html", &self.create_base_context())
    }

    pub fn render_not_found(&self) -> Result<String> {
        self.renderer
            .render("not_found.html", &self.create_base_context())
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let config = &self.blog.config;
        let site = SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: self.i18n.language().to_string(),
            home_url: self.helpers.url_for(""),
            logo_url: self.helpers.url_for("logo.svg"),
            styles_url: self.helpers.url_for("styles.css"),
        };

        let mut context = Context::new();
        context.insert("site", &site);
        context.insert("t", &self.i18n.get_all_translations());
        context
    }

    fn write_assets(&self) -> Result<()> {
        for (name, content) in ASSETS {
            write_file(&self.blog.public_dir.join(name), content)?;
        }
        Ok(())
    }

    /// Copy the site's static directory (images, fonts...) to the output
    fn copy_static_files(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, content).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))
}
