// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! MCP server implementation for repolens-mcp
//!
//! This module provides the MCP server that exposes read-only git status and
//! commit history to LLMs through a single `git_tool` tool.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use repolens_git::GitCli;
use rust_mcp_sdk::error::SdkResult;
use rust_mcp_sdk::mcp_server::{
    McpServerOptions, ServerHandler, ToMcpServerHandler, server_runtime,
};
use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, Implementation, InitializeResult,
    LATEST_PROTOCOL_VERSION, ListToolsResult, PaginatedRequestParams, RpcError,
    ServerCapabilities, ServerCapabilitiesTools, TextContent, Tool, ToolInputSchema,
    schema_utils::CallToolError,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::handlers::{self, DEFAULT_LOG_COUNT, HandlerError};

/// Name under which the git tool is registered
pub const GIT_TOOL_NAME: &str = "git_tool";

/// Convert a JSON object into the properties format expected by ToolInputSchema.
///
/// ToolInputSchema expects `HashMap<String, Map<String, Value>>` for properties,
/// where each key maps to a JSON object describing that property's schema.
fn make_properties(json_obj: Value) -> HashMap<String, Map<String, Value>> {
    let mut properties = HashMap::new();
    if let Value::Object(obj) = json_obj {
        for (key, value) in obj {
            if let Value::Object(inner) = value {
                properties.insert(key, inner);
            }
        }
    }
    properties
}

/// The repolens MCP server handler
///
/// Holds only immutable configuration, so concurrent tool calls share
/// nothing mutable.
pub struct RepolensServer {
    /// git runner used for every call
    git: GitCli,
    /// Default repository when a call omits `repo_path`
    workspace: Option<PathBuf>,
}

impl RepolensServer {
    /// Create a new server
    ///
    /// # Arguments
    ///
    /// * `git` - The git runner (program and timeout)
    /// * `workspace` - Optional default repository path
    #[must_use]
    pub fn new(git: GitCli, workspace: Option<PathBuf>) -> Self {
        Self { git, workspace }
    }

    /// Get the git runner
    #[must_use]
    pub fn git(&self) -> &GitCli {
        &self.git
    }

    /// Get the default workspace path
    #[must_use]
    pub fn workspace(&self) -> Option<&PathBuf> {
        self.workspace.as_ref()
    }

    /// Build the list of available tools
    pub fn build_tools() -> Vec<Tool> {
        vec![Self::git_tool()]
    }

    fn git_tool() -> Tool {
        Tool {
            name: GIT_TOOL_NAME.into(),
            description: Some(
                "Read-only git helper. 'status' returns `git status --porcelain` lines; \
                 'log' returns the most recent commits with hash, author, date and message. \
                 Git failures are reported in an `error` field."
                    .into(),
            ),
            input_schema: ToolInputSchema::new(
                vec!["action".into()],
                Some(make_properties(json!({
                    "action": {
                        "type": "string",
                        "enum": ["status", "log"],
                        "description": "Git action to run (case-insensitive)"
                    },
                    "repo_path": {
                        "type": "string",
                        "description": "Path to a local git repository (defaults to the server workspace)"
                    },
                    "n": {
                        "type": "integer",
                        "minimum": 0,
                        "default": DEFAULT_LOG_COUNT,
                        "description": "Number of commits for the 'log' action (whole number)"
                    }
                }))),
                None,
            ),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some("Git Status and Log".into()),
        }
    }

    /// Run one git_tool call and render it as MCP text content
    ///
    /// # Errors
    ///
    /// Returns `HandlerError` for malformed arguments or an unsupported action.
    pub async fn call_git_tool(
        &self,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, HandlerError> {
        let output =
            handlers::handle_git_tool(&self.git, arguments, self.workspace.as_ref()).await?;
        let text = serde_json::to_string_pretty(&output)?;
        Ok(CallToolResult::text_content(vec![TextContent::new(
            text, None, None,
        )]))
    }

    /// Route a tool call by name
    ///
    /// # Errors
    ///
    /// Returns `CallToolError` for an unknown tool or a failed `git_tool` call.
    pub async fn dispatch_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, CallToolError> {
        match name {
            GIT_TOOL_NAME => self
                .call_git_tool(arguments)
                .await
                .map_err(CallToolError::new),
            _ => Err(CallToolError::unknown_tool(name)),
        }
    }
}

/// Server identity and capabilities announced during initialization
#[must_use]
pub fn server_details() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: "repolens-mcp".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: Some("Repolens".into()),
            description: Some("Read-only git status and log for AI agents".into()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(
            "Call git_tool with action 'status' or 'log' and a repo_path to inspect a \
             local repository. The tool never modifies the repository."
                .into(),
        ),
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    }
}

/// Serve `server` over stdio until the client disconnects
///
/// # Errors
///
/// Returns an error if the transport cannot be created or the session fails.
pub async fn serve(server: RepolensServer) -> SdkResult<()> {
    let transport = StdioTransport::new(TransportOptions::default())?;
    let runtime = server_runtime::create_server(McpServerOptions {
        server_details: server_details(),
        transport,
        handler: server.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    info!("MCP server listening on stdio");
    runtime.start().await
}

/// ServerHandler implementation for the MCP protocol
#[async_trait]
impl ServerHandler for RepolensServer {
    /// Handle requests to list available tools
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: Self::build_tools(),
            meta: None,
            next_cursor: None,
        })
    }

    /// Handle requests to call a specific tool
    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        tracing::debug!(tool = %params.name, "Calling tool");

        self.dispatch_tool(&params.name, params.arguments).await
    }
}
