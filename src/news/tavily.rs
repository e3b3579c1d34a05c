// src/news/tavily.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::news::types::{NewsProvider, RawSearchResult, SearchDepth};

#[derive(Serialize)]
struct SearchReq<'a> {
    query: &'a str,
    search_depth: SearchDepth,
    max_results: u32,
}

#[derive(Deserialize)]
struct SearchResp {
    #[serde(default)]
    results: Vec<RawSearchResult>,
}

/// Tavily web search (`POST {base}/search`).
pub struct TavilyProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilyProvider {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("research-relay/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(20))
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl NewsProvider for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<Vec<RawSearchResult>> {
        let req = SearchReq {
            query,
            search_depth: depth,
            max_results,
        };
        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("tavily search request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("tavily returned {status}: {}", body.trim()));
        }
        let body: SearchResp = resp.json().await.context("malformed tavily reply")?;
        Ok(body.results)
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}
