//! MCP server that lets LLMs work with GitHub pull request reviews.
//!
//! Provides tools for fetching reviews and review comments, listing and
//! resolving review threads, and checking whether every thread under a
//! review has been resolved.

pub mod error;
pub mod github;
pub mod server;
