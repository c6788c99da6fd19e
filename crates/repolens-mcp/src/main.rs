// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! repolens-mcp: MCP server giving AI agents read-only access to git
//!
//! By default this binary serves the `git_tool` tool over MCP stdio. The
//! `status` and `log` subcommands run the tool once and print its JSON.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use repolens_mcp::config::Config;
use repolens_mcp::handlers;
use repolens_mcp::server::{self, RepolensServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // stdout carries the MCP transport, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config.log_level().into())
                .from_env_lossy(),
        )
        .init();

    config.validate().context("Invalid configuration")?;

    let git = config.git_cli();

    match config.command {
        None => {
            info!(
                git = %git.program().display(),
                timeout_secs = git.timeout().as_secs(),
                "Starting repolens-mcp server..."
            );
            let server = RepolensServer::new(git, config.workspace.clone());
            server::serve(server)
                .await
                .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
        }
        Some(ref command) => {
            let args = command.tool_args();
            let output = handlers::handle_git_tool(&git, Some(args), config.workspace.as_ref())
                .await
                .context("git_tool failed")?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
