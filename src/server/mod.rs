//! Development server with on-demand post generation
//!
//! Pre-built pages are served from the public directory. A post that was
//! not pre-built is generated in the background on its first request while
//! the visitor sees a placeholder that refreshes itself.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::content::ContentSource;
use crate::detail;
use crate::generator::Generator;
use crate::helpers;
use crate::Blog;

/// How long a slug that was not found is answered with 404 before asking again
const MISSING_TTL: Duration = Duration::from_secs(60);

/// Upper bound on remembered missing slugs
const MAX_MISSING: usize = 1024;

/// Slugs that are being generated or were recently not found
#[derive(Debug, Default)]
struct PostStatus {
    in_flight: HashSet<String>,
    missing: HashMap<String, Instant>,
}

impl PostStatus {
    /// Whether `slug` was not found within the last [`MISSING_TTL`]
    fn is_missing(&mut self, slug: &str, now: Instant) -> bool {
        match self.missing.get(slug) {
            Some(at) if now.saturating_duration_since(*at) < MISSING_TTL => true,
            Some(_) => {
                self.missing.remove(slug);
                false
            }
            None => false,
        }
    }

    fn mark_missing(&mut self, slug: &str, now: Instant) {
        if self.missing.len() >= MAX_MISSING {
            self.missing
                .retain(|_, at| now.saturating_duration_since(*at) < MISSING_TTL);
        }
        if self.missing.len() >= MAX_MISSING {
            let oldest = self
                .missing
                .iter()
                .min_by_key(|(_, at)| **at)
                .map(|(slug, _)| slug.clone());
            if let Some(oldest) = oldest {
                self.missing.remove(&oldest);
            }
        }
        self.missing.insert(slug.to_string(), now);
    }
}

/// Server state
pub struct ServerState {
    blog: Blog,
    generator: Generator,
    source: Arc<dyn ContentSource>,
    content_ref: Option<String>,
    status: Mutex<PostStatus>,
}

impl ServerState {
    pub fn new(
        blog: &Blog,
        source: Arc<dyn ContentSource>,
        content_ref: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            generator: Generator::new(blog)?,
            source,
            content_ref,
            status: Mutex::new(PostStatus::default()),
        })
    }

    async fn is_missing(&self, slug: &str) -> bool {
        self.status.lock().await.is_missing(slug, Instant::now())
    }

    /// Start generating a post page unless a task for it is already running
    pub async fn start_generation(self: &Arc<Self>, slug: &str) -> Option<JoinHandle<()>> {
        if !self.status.lock().await.in_flight.insert(slug.to_string()) {
            tracing::debug!("Generation of {} already in progress", slug);
            return None;
        }

        let state = Arc::clone(self);
        let slug = slug.to_string();
        Some(tokio::spawn(async move {
            let result = detail::resolve(
                state.source.as_ref(),
                &state.blog.config,
                &slug,
                state.content_ref.as_deref(),
            )
            .await;

            let mut status = state.status.lock().await;
            match result {
                Ok(page) => match state.generator.write_post(&page) {
                    Ok(path) => tracing::info!("Generated on request: {:?}", path),
                    Err(e) => tracing::error!("Failed to write {}: {}", slug, e),
                },
                Err(e) if e.is_not_found() => {
                    tracing::info!("No post with slug {}", slug);
                    status.mark_missing(&slug, Instant::now());
                }
                // Left out of both sets so the next request retries
                Err(e) => tracing::error!("Failed to resolve {}: {}", slug, e),
            }
            status.in_flight.remove(&slug);
        }))
    }
}

/// Build the router
pub fn router(state: Arc<ServerState>) -> Router {
    let public_dir = state.blog.public_dir.clone();
    let static_files = ServeDir::new(&public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(public_dir.join("404.html")));

    Router::new()
        .route("/post/:slug", get(post_page))
        .route("/post/:slug/", get(post_page))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(
    blog: &Blog,
    source: Arc<dyn ContentSource>,
    content_ref: Option<String>,
    ip: &str,
    port: u16,
) -> Result<()> {
    let state = Arc::new(ServerState::new(blog, source, content_ref)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve a post page, generating it first if needed
async fn post_page(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    if !helpers::is_valid_slug(&slug) {
        return not_found(&state);
    }

    let path = state.generator.post_output_path(&slug);
    if let Ok(content) = tokio::fs::read_to_string(&path).await {
        return Html(content).into_response();
    }

    if state.is_missing(&slug).await {
        return not_found(&state);
    }

    state.start_generation(&slug).await;
    render(state.generator.render_fallback(), StatusCode::OK)
}

fn not_found(state: &ServerState) -> Response {
    render(state.generator.render_not_found(), StatusCode::NOT_FOUND)
}

fn render(page: Result<String>, status: StatusCode) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
