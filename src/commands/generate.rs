//! Generate static files

use anyhow::Result;

use crate::content::ContentSource;
use crate::generator::{GenerateReport, Generator};
use crate::Blog;

/// Generate the listing page and the pre-built post pages
///
/// `content_ref` selects a preview release instead of the published content.
pub async fn run(
    blog: &Blog,
    source: &dyn ContentSource,
    content_ref: Option<&str>,
) -> Result<GenerateReport> {
    let start = std::time::Instant::now();

    if let Some(content_ref) = content_ref {
        tracing::info!("Generating preview for ref {}", content_ref);
    }

    let generator = Generator::new(blog)?;
    let report = generator.generate(source, content_ref).await?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Document, MemorySource};
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_with_no_posts() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let source = MemorySource::new(Vec::new());

        let report = run(&blog, &source, None).await.unwrap();
        assert_eq!(report, GenerateReport::default());
        assert!(blog.public_dir.join("index.html").exists());
    }

    #[tokio::test]
    async fn test_generate_preview() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let doc: Document = serde_json::from_value(json!({
            "uid": "ola",
            "type": "posts",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "data": { "title": "Olá", "subtitle": "", "author": "Ana", "content": [] }
        }))
        .unwrap();
        let source = MemorySource::new(vec![doc]);

        let report = run(&blog, &source, Some("release-ref")).await.unwrap();
        assert_eq!(report.post_pages, vec!["ola"]);

        let index = std::fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(index.contains("Sair do modo Preview"));
    }
}
