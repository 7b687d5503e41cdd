//! MCP server exposing the Oura API as schema-described tools.
//!
//! Callers supply their personal access token on every invocation; the server
//! keeps no credentials of its own. Each tool call builds a client scoped to
//! that call, fetches one collection, reshapes it, and replies with either
//! `{"data": [...]}` or `{"error": ..., "kind": ...}` — failures never
//! surface as protocol-level faults.

use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::Json;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router};
use schemars::JsonSchema;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use oura_client::transform::reshape;
use oura_client::{DateRange, Endpoint, OuraClientFactory};

pub mod config;
pub mod error;

pub use error::{ErrorKind, ServerError};

#[derive(Clone)]
pub struct OuraMcpHandler {
    clients: Arc<dyn OuraClientFactory>,
    validate_token: bool,
    tool_router: rmcp::handler::server::tool::ToolRouter<OuraMcpHandler>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct RangeParams {
    /// Your Oura Personal Access Token
    pub access_token: String,
    /// Start date in ISO format (YYYY-MM-DD)
    pub start_date: String,
    /// End date in ISO format (YYYY-MM-DD)
    pub end_date: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct TokenParams {
    /// Your Oura Personal Access Token
    pub access_token: String,
}

/// Reply shape shared by every tool: the cleaned records on success, a
/// kind-tagged message on failure.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(untagged)]
#[schemars(extend("type" = "object"))]
pub enum ToolResponse {
    Data { data: Vec<serde_json::Value> },
    Failure { error: String, kind: ErrorKind },
}

impl From<Result<Vec<serde_json::Value>, ServerError>> for ToolResponse {
    fn from(result: Result<Vec<serde_json::Value>, ServerError>) -> Self {
        match result {
            Ok(data) => ToolResponse::Data { data },
            Err(e) => ToolResponse::Failure {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ServerError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ServerError::InvalidDate(s.to_string()))
}

#[tool_router]
impl OuraMcpHandler {
    pub fn new(clients: Arc<dyn OuraClientFactory>, validate_token: bool) -> Self {
        Self {
            clients,
            validate_token,
            tool_router: Self::tool_router(),
        }
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    /// One tool invocation end to end: token check, date parsing, optional
    /// live validation, fetch, reshape. `range` of `None` means today.
    async fn execute(
        &self,
        endpoint: Endpoint,
        access_token: &str,
        range: Option<(&str, &str)>,
    ) -> Result<Vec<serde_json::Value>, ServerError> {
        if access_token.trim().is_empty() {
            return Err(ServerError::MissingToken);
        }
        let range = match range {
            Some((start, end)) => DateRange::new(parse_date(start)?, Some(parse_date(end)?)),
            None => DateRange::today(),
        };

        let client = self
            .clients
            .client_for(SecretString::new(access_token.into()));
        if self.validate_token && !client.validate_token().await? {
            return Err(ServerError::RejectedToken);
        }

        let raw = client.fetch_records(endpoint, range).await?;
        Ok(reshape(endpoint, &raw))
    }

    async fn range_query(&self, endpoint: Endpoint, p: RangeParams) -> ToolResponse {
        self.execute(
            endpoint,
            &p.access_token,
            Some((p.start_date.as_str(), p.end_date.as_str())),
        )
        .await
        .into()
    }

    async fn today_query(&self, endpoint: Endpoint, p: TokenParams) -> ToolResponse {
        self.execute(endpoint, &p.access_token, None).await.into()
    }

    #[tool(
        name = "get_sleep_data",
        description = "Get detailed sleep data for a specific date range"
    )]
    pub async fn get_sleep_data(
        &self,
        params: Parameters<RangeParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(self.range_query(Endpoint::Sleep, params.0).await))
    }

    #[tool(
        name = "get_daily_sleep_data",
        description = "Get daily sleep summaries for a specific date range"
    )]
    pub async fn get_daily_sleep_data(
        &self,
        params: Parameters<RangeParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(self.range_query(Endpoint::DailySleep, params.0).await))
    }

    #[tool(
        name = "get_readiness_data",
        description = "Get readiness data for a specific date range"
    )]
    pub async fn get_readiness_data(
        &self,
        params: Parameters<RangeParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(
            self.range_query(Endpoint::DailyReadiness, params.0).await,
        ))
    }

    #[tool(
        name = "get_resilience_data",
        description = "Get resilience data for a specific date range"
    )]
    pub async fn get_resilience_data(
        &self,
        params: Parameters<RangeParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(
            self.range_query(Endpoint::DailyResilience, params.0).await,
        ))
    }

    #[tool(name = "get_today_sleep_data", description = "Get sleep data for today")]
    pub async fn get_today_sleep_data(
        &self,
        params: Parameters<TokenParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(self.today_query(Endpoint::Sleep, params.0).await))
    }

    #[tool(
        name = "get_today_daily_sleep_data",
        description = "Get the daily sleep summary for today"
    )]
    pub async fn get_today_daily_sleep_data(
        &self,
        params: Parameters<TokenParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(self.today_query(Endpoint::DailySleep, params.0).await))
    }

    #[tool(
        name = "get_today_readiness_data",
        description = "Get readiness data for today"
    )]
    pub async fn get_today_readiness_data(
        &self,
        params: Parameters<TokenParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(
            self.today_query(Endpoint::DailyReadiness, params.0).await,
        ))
    }

    #[tool(
        name = "get_today_resilience_data",
        description = "Get resilience data for today"
    )]
    pub async fn get_today_resilience_data(
        &self,
        params: Parameters<TokenParams>,
    ) -> Result<Json<ToolResponse>, String> {
        Ok(Json(
            self.today_query(Endpoint::DailyResilience, params.0).await,
        ))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for OuraMcpHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        let mut info = rmcp::model::ServerInfo::default();
        info.instructions = Some(
            "Oura MCP server - query sleep, readiness, and resilience data \
             from the Oura API. Every tool takes your Personal Access Token."
                .into(),
        );
        info.capabilities = rmcp::model::ServerCapabilities::builder()
            .enable_tools()
            .build();
        info
    }
}
