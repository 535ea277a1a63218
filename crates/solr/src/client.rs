use crate::config::SolrConfig;
use crate::error::{Result, SolrError};
use diagnostics::*;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

/// Status and body of a Solr response. Interpreting the status is left to
/// the caller because some calls tolerate failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The Solr admin and update calls used here. Errors are transport
/// failures only.
pub trait SolrApi {
    fn list_collections(&self) -> Result<Reply>;

    fn create_collection(&self, name: &str, num_shards: u32, replication_factor: u32)
    -> Result<Reply>;

    fn set_user_property(&self, name: &str, property: &str, value: &str) -> Result<Reply>;

    /// Add one document and commit immediately.
    fn add_document(&self, name: &str, document: &serde_json::Value) -> Result<Reply>;
}

impl<T: SolrApi + ?Sized> SolrApi for &T {
    fn list_collections(&self) -> Result<Reply> {
        (**self).list_collections()
    }

    fn create_collection(
        &self,
        name: &str,
        num_shards: u32,
        replication_factor: u32,
    ) -> Result<Reply> {
        (**self).create_collection(name, num_shards, replication_factor)
    }

    fn set_user_property(&self, name: &str, property: &str, value: &str) -> Result<Reply> {
        (**self).set_user_property(name, property, value)
    }

    fn add_document(&self, name: &str, document: &serde_json::Value) -> Result<Reply> {
        (**self).add_document(name, document)
    }
}

/// Blocking Solr client with Knox bearer authentication.
pub struct HttpSolrApi {
    http: Client,
    base: Url,
}

impl HttpSolrApi {
    pub fn new(config: &SolrConfig) -> Result<Self> {
        let token = config
            .bearer_token
            .as_deref()
            .ok_or_else(|| SolrError::Configuration("Solr bearer token is not set".to_string()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            SolrError::Configuration("bearer token contains invalid header characters".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if config.insecure_tls {
            warn!("TLS certificate verification is disabled for {url}", url: config.url.as_str());
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.insecure_tls)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base: base_url(&config.url)?,
        })
    }

    fn send(&self, url: &Url, request: RequestBuilder) -> Result<Reply> {
        debug!("Solr request {url}", url: url.as_str());
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(Reply { status, body })
    }

    pub(crate) fn collections_url(base: &Url, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = base.join("admin/collections")?;
        url.query_pairs_mut().extend_pairs(params).append_pair("wt", "json");
        Ok(url)
    }

    pub(crate) fn config_url(base: &Url, name: &str) -> Result<Url> {
        Ok(base.join(&format!("{name}/config"))?)
    }

    pub(crate) fn update_url(base: &Url, name: &str) -> Result<Url> {
        let mut url = base.join(&format!("{name}/update/json/docs"))?;
        url.query_pairs_mut().append_pair("commit", "true");
        Ok(url)
    }
}

impl SolrApi for HttpSolrApi {
    fn list_collections(&self) -> Result<Reply> {
        let url = Self::collections_url(&self.base, &[("action", "LIST")])?;
        self.send(&url, self.http.get(url.clone()))
    }

    fn create_collection(
        &self,
        name: &str,
        num_shards: u32,
        replication_factor: u32,
    ) -> Result<Reply> {
        let shards = num_shards.to_string();
        let replicas = replication_factor.to_string();
        let url = Self::collections_url(
            &self.base,
            &[
                ("action", "CREATE"),
                ("name", name),
                ("numShards", &shards),
                ("replicationFactor", &replicas),
            ],
        )?;
        self.send(&url, self.http.get(url.clone()))
    }

    fn set_user_property(&self, name: &str, property: &str, value: &str) -> Result<Reply> {
        let url = Self::config_url(&self.base, name)?;
        let payload = serde_json::json!({ "set-user-property": { property: value } });
        self.send(&url, self.http.post(url.clone()).body(payload.to_string()))
    }

    fn add_document(&self, name: &str, document: &serde_json::Value) -> Result<Reply> {
        let url = Self::update_url(&self.base, name)?;
        self.send(&url, self.http.post(url.clone()).body(document.to_string()))
    }
}

fn base_url(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(SolrError::Configuration("Solr URL is not set".to_string()));
    }
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{url}/"))?)
    }
}
