//! `OmdbClient` - OMDb API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalOmdbApi;
use super::types::{DetailsResult, OmdbResponse, SearchParams, SearchResult};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb API client.
///
/// One HTTP request per call, without retry.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Endpoint URL.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the endpoint URL (config or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Endpoint URL this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request with the API key and decodes the OMDb envelope.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<OmdbResponse<T>> {
        tracing::debug!(?query, "OMDb API request");

        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .build()
            .context("failed to build OMDb request")?;

        let result = self.http_client.execute(request).await;
        let response = result.context("OMDb request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(OmdbResponse::Failure { error: Some(message) }) =
                OmdbResponse::<serde_json::Value>::from_json(&body)
            {
                bail!("OMDb API error (HTTP {status}): {message}");
            }
            bail!("OMDb API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .context("failed to read OMDb response body")?;
        let parsed = OmdbResponse::from_json(&body).context("failed to decode OMDb response")?;

        if let OmdbResponse::Failure { ref error } = parsed {
            tracing::debug!(error = error.as_deref().unwrap_or("-"), "OMDb reported failure");
        }

        Ok(parsed)
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip_all)]
    async fn search_movies(&self, params: &SearchParams) -> Result<SearchResult> {
        let query: Vec<(&str, String)> = vec![
            ("s", params.query.clone()),
            ("page", params.page.to_string()),
            ("type", String::from(params.media_type.as_str())),
        ];

        let mut result: SearchResult = self.get_json(&query).await?;
        if let OmdbResponse::Success(ref mut page) = result {
            page.retain_unique();
        }
        Ok(result)
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, imdb_id: &str) -> Result<DetailsResult> {
        let query = [("i", String::from(imdb_id)), ("plot", String::from("full"))];
        self.get_json(&query).await
    }

    #[instrument(skip_all)]
    async fn search_by_title(&self, title: &str, year: Option<&str>) -> Result<DetailsResult> {
        let mut query: Vec<(&str, String)> = vec![("t", String::from(title))];
        if let Some(year) = year {
            query.push(("y", String::from(year)));
        }
        query.push(("plot", String::from("full")));

        self.get_json(&query).await
    }
}
