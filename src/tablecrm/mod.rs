use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{Config, TokenPlacement};
use crate::tablecrm::model::{NomenclatureItem, UpstreamReply};

pub mod model;

const TABLECRM_API_BASE: &str = "https://app.tablecrm.com/api/";
const NOMENCLATURE_PATH: &str = "nomenclature";

/// Outbound side of create-product. Handlers only see this trait.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_nomenclature(
        &self,
        token: &str,
        items: &[NomenclatureItem],
    ) -> Result<UpstreamReply>;
}

#[derive(Clone)]
pub struct TableCrmClient {
    http: Client,
    base_url: Url,
    placement: TokenPlacement,
}

impl fmt::Debug for TableCrmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCrmClient")
            .field("base_url", &self.base_url)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

/// A single request's token placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Bearer,
    Query,
}

impl Attempt {
    fn as_str(&self) -> &'static str {
        match self {
            Attempt::Bearer => "bearer",
            Attempt::Query => "query",
        }
    }
}

impl TableCrmClient {
    pub fn new(placement: TokenPlacement, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(TABLECRM_API_BASE).context("invalid default TableCRM URL")?;
        Self::with_base_url(base_url, placement, timeout)
    }

    pub fn with_base_url(
        base_url: Url,
        placement: TokenPlacement,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent("tablecrm-cards/0.1")
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url,
            placement,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let base_url =
            Url::parse(&cfg.tablecrm.base_url).context("invalid tablecrm.base_url")?;
        Self::with_base_url(
            base_url,
            cfg.tablecrm.token_placement,
            Duration::from_secs(cfg.tablecrm.timeout_seconds),
        )
    }

    pub fn placement(&self) -> TokenPlacement {
        self.placement
    }

    /// Nomenclature endpoint without any token attached.
    pub fn endpoint(&self) -> Result<Url> {
        self.base_url
            .join(NOMENCLATURE_PATH)
            .context("invalid TableCRM base URL")
    }

    fn build_request(
        &self,
        attempt: Attempt,
        token: &str,
        items: &[NomenclatureItem],
    ) -> Result<reqwest::Request> {
        let endpoint = self.endpoint()?;
        let builder = self
            .http
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(items);
        let builder = match attempt {
            Attempt::Bearer => builder.header("Authorization", format!("Bearer {}", token)),
            Attempt::Query => builder.query(&[("token", token)]),
        };
        builder
            .build()
            .context("failed to build nomenclature request")
    }

    async fn send(
        &self,
        attempt: Attempt,
        token: &str,
        items: &[NomenclatureItem],
    ) -> Result<UpstreamReply> {
        let request = self.build_request(attempt, token, items)?;
        // The query string may hold the token; log only scheme, host and path.
        let mut logged = request.url().clone();
        logged.set_query(None);
        info!(url=%logged, placement = attempt.as_str(), items = items.len(), "sending nomenclature request");

        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach TableCRM")?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .context("failed to read TableCRM response")?;

        if (200..300).contains(&status) {
            info!(status, "nomenclature request accepted");
        } else {
            warn!(status, body = %body, placement = attempt.as_str(), "TableCRM rejected nomenclature request");
        }
        Ok(UpstreamReply { status, body })
    }
}

#[async_trait]
impl CatalogService for TableCrmClient {
    async fn create_nomenclature(
        &self,
        token: &str,
        items: &[NomenclatureItem],
    ) -> Result<UpstreamReply> {
        match self.placement {
            TokenPlacement::Query => self.send(Attempt::Query, token, items).await,
            TokenPlacement::Bearer => self.send(Attempt::Bearer, token, items).await,
            TokenPlacement::BearerThenQuery => {
                let first = self.send(Attempt::Bearer, token, items).await?;
                if first.is_success() {
                    return Ok(first);
                }
                info!(status = first.status, "retrying with query token");
                let mut second = self.send(Attempt::Query, token, items).await?;
                if !second.is_success() && second.body.trim().is_empty() {
                    second.body = first.body;
                }
                Ok(second)
            }
        }
    }
}
