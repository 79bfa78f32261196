//! HTTP client for the Prismic REST API (v2)

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ApiResponse, ContentRepository, Predicate, PrismicError, QueryOptions, RawDocument};
use crate::config::PrismicConfig;

/// API root response; only the refs matter here
#[derive(Debug, Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// Prismic repository reached over HTTP
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl PrismicClient {
    pub fn new(config: &PrismicConfig) -> Result<Self, PrismicError> {
        let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| PrismicError::InvalidEndpoint(config.endpoint.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Resolve the ref of the currently published content
    async fn master_ref(&self) -> Result<String, PrismicError> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }

        let root: ApiRoot = self.get_json(url).await?;
        root.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(PrismicError::NoMasterRef)
    }

    fn search_url(&self, reference: &str, predicate: &Predicate, options: &QueryOptions) -> Url {
        let mut url = self.endpoint.clone();
        // `new` rejects cannot-be-a-base endpoints
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push("documents").push("search");
        }

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", reference);
            query.append_pair("q", &predicate.to_query());
            if !options.fetch.is_empty() {
                query.append_pair("fetch", &options.fetch.join(","));
            }
            if let Some(size) = options.page_size {
                query.append_pair("pageSize", &size.to_string());
            }
            if let Some(token) = &self.access_token {
                query.append_pair("access_token", token);
            }
        }

        url
    }

    /// Cursors are opaque, but they must point back at our repository
    fn check_cursor(&self, cursor: &str) -> Result<Url, PrismicError> {
        let url = Url::parse(cursor).map_err(|_| PrismicError::ForeignCursor(cursor.to_string()))?;
        if url.scheme() != self.endpoint.scheme()
            || url.host_str() != self.endpoint.host_str()
            || url.port_or_known_default() != self.endpoint.port_or_known_default()
        {
            return Err(PrismicError::ForeignCursor(cursor.to_string()));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, PrismicError> {
        tracing::debug!("GET {}", url.path());
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrismicError::Status {
                status: status.as_u16(),
                url: without_token(url),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| PrismicError::Decode(e.to_string()))
    }
}

/// Strip the access token before a URL ends up in an error or a log line
fn without_token(mut url: Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "access_token")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url.to_string()
}

#[async_trait]
impl ContentRepository for PrismicClient {
    async fn query(
        &self,
        predicate: &Predicate,
        options: &QueryOptions,
    ) -> Result<ApiResponse, PrismicError> {
        let reference = self.master_ref().await?;
        let url = self.search_url(&reference, predicate, options);
        let response: ApiResponse = self.get_json(url).await?;
        tracing::debug!(
            "{} returned {} documents (more: {})",
            predicate,
            response.results.len(),
            response.next_page.is_some()
        );
        Ok(response)
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawDocument, PrismicError> {
        let predicate = Predicate::uid(doc_type, uid);
        let options = QueryOptions::new().page_size(1);
        let response = self.query(&predicate, &options).await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PrismicError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<ApiResponse, PrismicError> {
        let url = self.check_cursor(cursor)?;
        self.get_json(url).await
    }
}
