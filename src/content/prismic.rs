//! Prismic REST API v2 client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, error};
use url::Url;

use super::query::{query_string, Predicate, QueryOptions};
use super::{ApiPage, ContentError, ContentSource};
use crate::config::PrismicConfig;

/// Authenticated client for one Prismic repository
///
/// The master ref is looked up on first use and reused afterwards; queries
/// carrying an explicit ref (previews) skip the lookup.
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

/// Entry point response, only the refs are used
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

impl PrismicClient {
    pub fn new(config: &PrismicConfig) -> Result<Self, ContentError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: config
                .access_token
                .clone()
                .filter(|token| !token.is_empty()),
            master_ref: OnceCell::new(),
        })
    }

    async fn master_ref(&self) -> Result<&str, ContentError> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let info: ApiInfo = self.get_json(self.authorize(self.endpoint.clone())).await?;
                info.refs
                    .into_iter()
                    .find(|r| r.is_master_ref)
                    .map(|r| r.reference)
                    .ok_or_else(|| ContentError::MissingRef(self.endpoint.to_string()))
            })
            .await?;
        Ok(reference.as_str())
    }

    /// Build the search URL for a query
    fn search_url(
        &self,
        content_ref: &str,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<Url, ContentError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/documents/search", base))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", content_ref);
            if !predicates.is_empty() {
                pairs.append_pair("q", &query_string(predicates));
            }
            if !options.fetch.is_empty() {
                pairs.append_pair("fetch", &options.fetch.join(","));
            }
            if let Some(size) = options.page_size {
                pairs.append_pair("pageSize", &size.to_string());
            }
            if let Some(orderings) = options.orderings_param() {
                pairs.append_pair("orderings", &orderings);
            }
        }
        Ok(self.authorize(url))
    }

    /// Attach the access token unless the URL already carries one
    fn authorize(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            if !url.query_pairs().any(|(key, _)| key == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ContentError> {
        let target = request_target(&url);
        debug!("Sending request to {}", target);

        let resp = self.http.get(url).send().await?;
        match resp.status() {
            reqwest::StatusCode::OK => Ok(resp.json::<T>().await?),
            status => {
                error!("request {} status: {}", target, status);
                Err(ContentError::Status {
                    status: status.as_u16(),
                    url: target,
                })
            }
        }
    }
}

/// Host and path of a request, for logs and errors
///
/// The query string is left out since it may hold the access token.
fn request_target(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<ApiPage, ContentError> {
        let content_ref = match &options.content_ref {
            Some(reference) => reference.as_str(),
            None => self.master_ref().await?,
        };
        let url = self.search_url(content_ref, predicates, options)?;
        self.get_json(url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<ApiPage, ContentError> {
        let url = self.authorize(Url::parse(url)?);
        self.get_json(url).await
    }
}
