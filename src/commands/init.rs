//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Blog Configuration

# Site
title: spacetraveling
description: ''
language: pt-BR
timezone: America/Sao_Paulo
date_format: dd MMM yyyy

# URL
url: http://localhost:4000
root: /

# Directory
public_dir: public
static_dir: static

# Content repository
## The access token can also be given in PRISMIC_ACCESS_TOKEN
prismic:
  endpoint: https://your-repository.cdn.prismic.io/api/v2
  access_token:
  document_type: posts

# Home page setting
listing:
  page_size: 1

# Post pages
detail:
  prebuild_count: 3
  words_per_minute: 200

# utterances comments
comments:
  enable: true
  script: https://utteranc.es/client.js
  repo: ''
  issue_term: url
  theme: github-dark
"#;

/// Sample documents for `--fixtures` runs
const SAMPLE_POSTS: &str = r#"[
  {
    "id": "YFuAQRIAACMAyYvD",
    "uid": "como-utilizar-hooks",
    "type": "posts",
    "first_publication_date": "2021-03-15T19:25:28+0000",
    "last_publication_date": "2021-03-15T19:25:28+0000",
    "data": {
      "title": "Como utilizar Hooks",
      "subtitle": "Pensando em sincronização em vez de ciclos de vida",
      "author": "Joseph Oliveira",
      "banner": { "url": "https://images.prismic.io/spacetraveling/banner.png" },
      "content": [
        {
          "heading": "Proin et varius",
          "body": [
            { "type": "paragraph", "text": "Lorem ipsum dolor sit amet, consectetur adipiscing elit.", "spans": [] }
          ]
        }
      ]
    }
  },
  {
    "id": "YFuAeRIAACQAyYvQ",
    "uid": "criando-um-app-cra-do-zero",
    "type": "posts",
    "first_publication_date": "2021-03-25T19:27:35+0000",
    "last_publication_date": "2021-03-25T19:27:35+0000",
    "data": {
      "title": "Criando um app CRA do zero",
      "subtitle": "Tudo sobre como criar a sua primeira aplicação utilizando Create React App",
      "author": "Danilo Vieira",
      "banner": { "url": "https://images.prismic.io/spacetraveling/banner-2.png" },
      "content": [
        {
          "heading": "Cras laoreet mi",
          "body": [
            { "type": "paragraph", "text": "Nullam dolor sapien, vulputate eu diam at, condimentum hendrerit tellus.", "spans": [] }
          ]
        }
      ]
    }
  }
]
"#;

/// Initialize a new blog in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("static"))?;
    fs::create_dir_all(target_dir.join("languages"))?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;
    write_if_missing(&target_dir.join("posts.json"), SAMPLE_POSTS)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::MemorySource;

    #[test]
    fn test_init_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("static").is_dir());
        assert!(dir.path().join("languages").is_dir());

        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.prismic.document_type, "posts");
        assert_eq!(config.listing.page_size, 1);

        let source = MemorySource::load(dir.path().join("posts.json")).unwrap();
        assert_eq!(source.request_count(), 0);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "title: Mine\n").unwrap();
        init_site(dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("_config.yml")).unwrap();
        assert_eq!(content, "title: Mine\n");
    }
}
