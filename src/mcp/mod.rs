//! MCP (Model Context Protocol) server and tool types.
//!
//! This module provides an MCP server for GitLab external status checks,
//! allowing AI assistants to inspect checks and report their status.
//!
//! # Example
//!
//! ```no_run
//! use glstatus::mcp::StatusCheckServer;
//!
//! # fn main() -> glstatus::Result<()> {
//! let server = StatusCheckServer::from_env()?;
//! // Server can now be used with rmcp transport
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::StatusCheckServer;
