//! List the posts in the content repository

use anyhow::Result;

use crate::content::ContentSource;
use crate::listing;
use crate::Blog;

/// Print every post, following the listing cursors to the end
pub async fn run(blog: &Blog, source: &dyn ContentSource) -> Result<()> {
    let state = listing::load_all(source, &blog.config, None).await?;
    let tz = blog.config.tz();

    println!("Posts ({}):", state.posts.len());
    for post in &state.posts {
        let date = post
            .first_publication_date
            .map(|d| d.with_timezone(&tz).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unpublished".to_string());
        println!("  {} - {} [{}]", date, post.title, post.uid);
    }

    Ok(())
}
