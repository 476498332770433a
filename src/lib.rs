//! psmv - Search the Persistent Semantic Memory Vault.
//!
//! The vault is two flat directories of text files: curated "crown jewels"
//! (`.md`) and the less curated "residual stream" (`.yaml`, `.md`). Every
//! operation reads the directories afresh; nothing is indexed or cached.
//!
//! # Modules
//!
//! - [`commands`] - High-level operations (search, jewel, list, stream)
//! - [`search`] - Term-overlap scoring, ranking and snippets
//! - [`vault`] - Collections and document loading
//! - [`storage`] - Storage backend trait and implementations
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod search;
pub mod storage;
pub mod vault;

#[cfg(feature = "mcp")]
pub mod mcp;
