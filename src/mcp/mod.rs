//! MCP server implementation for psmv.
//!
//! Exposes the vault operations as MCP tools for AI editors. Every tool
//! answers with pretty-printed JSON text; failures come back as an
//! `{"error": ...}` payload flagged as a tool error rather than a protocol
//! error, so a bad call never disturbs the session.

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ErrorData as McpError, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commands::{self, DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, DEFAULT_STREAM_LIMIT};
use crate::config::VaultPaths;
use crate::vault::Vault;

/// Parameters for `search_vault` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "The search query to find relevant memories")]
    pub query: String,
    #[schemars(description = "Maximum number of results to return (default: 10)")]
    pub limit: Option<Value>,
}

/// Parameters for `get_crown_jewel` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct JewelParams {
    #[schemars(description = "The name/filename of the Crown Jewel (partial match supported)")]
    pub name: String,
}

/// Parameters for `list_crown_jewels` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListParams {
    #[schemars(description = "Maximum number to list (default: 20)")]
    pub limit: Option<Value>,
}

/// Parameters for `get_residual_stream` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StreamParams {
    #[schemars(description = "Filename pattern to match (e.g., 'v16' or 'vyavasthit')")]
    pub pattern: Option<String>,
    #[schemars(description = "Maximum entries to return (default: 5)")]
    pub limit: Option<Value>,
}

/// MCP server exposing vault tools.
#[derive(Clone)]
pub struct VaultServer {
    vault: Vault,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl VaultServer {
    #[must_use]
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search the Persistent Semantic Memory Vault for relevant memories, documents, and knowledge. Searches crown jewels and residual stream entries."
    )]
    async fn search_vault(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = parse_limit(params.limit.as_ref(), DEFAULT_SEARCH_LIMIT)
            .map(|limit| commands::search(&self.vault, &params.query, limit));
        Ok(respond(response))
    }

    #[tool(
        description = "Retrieve a specific Crown Jewel by name. Crown Jewels are transmission-grade insights with high potency."
    )]
    async fn get_crown_jewel(
        &self,
        Parameters(params): Parameters<JewelParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(respond(commands::get_jewel(&self.vault, &params.name)))
    }

    #[tool(description = "List all available Crown Jewels in the vault.")]
    async fn list_crown_jewels(
        &self,
        Parameters(params): Parameters<ListParams>,
    ) -> Result<CallToolResult, McpError> {
        let list = parse_limit(params.limit.as_ref(), DEFAULT_LIST_LIMIT)
            .map(|limit| commands::list_jewels(&self.vault, limit));
        Ok(respond(list))
    }

    #[tool(
        description = "Retrieve entries from the residual stream - swarm contributions and emergent patterns."
    )]
    async fn get_residual_stream(
        &self,
        Parameters(params): Parameters<StreamParams>,
    ) -> Result<CallToolResult, McpError> {
        let listing = parse_limit(params.limit.as_ref(), DEFAULT_STREAM_LIMIT)
            .map(|limit| commands::get_stream(&self.vault, params.pattern.as_deref(), limit));
        Ok(respond(listing))
    }
}

#[tool_handler]
impl ServerHandler for VaultServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "psmv provides read-only access to the Persistent Semantic Memory Vault. \
                Use search_vault to find documents, list_crown_jewels to browse, \
                get_crown_jewel to read one in full, and get_residual_stream for recent \
                stream entries."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Read an optional `limit` argument.
///
/// Limits arrive as raw JSON so a bad value reaches the tool as an `{error}`
/// payload instead of failing argument decoding. Absent or `null` means
/// `default`.
fn parse_limit(limit: Option<&Value>, default: usize) -> anyhow::Result<usize> {
    let Some(value) = limit.filter(|v| !v.is_null()) else {
        return Ok(default);
    };

    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| anyhow::anyhow!("limit must be a non-negative integer, got {value}"))
}

/// Render a tool outcome as a JSON text payload.
///
/// Returns the payload and whether it describes a failure.
fn render<T: Serialize>(outcome: anyhow::Result<T>) -> (String, bool) {
    let rendered = outcome.and_then(|value| serde_json::to_string_pretty(&value).map_err(Into::into));

    match rendered {
        Ok(text) => (text, false),
        Err(e) => {
            tracing::warn!(error = %e, "tool call failed");
            let payload = serde_json::json!({ "error": format!("{e:#}") });
            (
                serde_json::to_string_pretty(&payload).unwrap_or_default(),
                true,
            )
        }
    }
}

fn respond<T: Serialize>(outcome: anyhow::Result<T>) -> CallToolResult {
    match render(outcome) {
        (text, false) => CallToolResult::success(vec![Content::text(text)]),
        (text, true) => CallToolResult::error(vec![Content::text(text)]),
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve(paths: VaultPaths) -> anyhow::Result<()> {
    tracing::info!(vault = %paths.base.display(), "starting MCP server on stdio");
    tracing::info!(
        crown_jewels = %paths.crown_jewels.display(),
        residual_stream = %paths.residual_stream.display(),
        "vault collections"
    );

    let server = VaultServer::new(paths.into_vault());
    let service = server
        .serve(stdio())
        .await
        .map_err(|e| anyhow::anyhow!("MCP transport failed to start: {e}"))?;
    service.waiting().await?;
    Ok(())
}
