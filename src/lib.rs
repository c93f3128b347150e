//! Shorthost - a multi-tenant URL shortener and static-site hosting service
//!
//! One deployment serves three hostnames: a link-redirection service,
//! an object-storage-backed static file server for user sites, and a
//! session-gated admin API. Dispatch is by exact Host header match.
//!
//! # Architecture
//! - `api`: hostname router, session gate, HTTP handlers
//! - `services`: asset resolution, file tree, ZIP import, analytics, GeoIP
//! - `storage`: Sea-ORM data access (links, sites, analytics, sessions, kv)
//! - `object_store`: S3-backed blob store adapter
//! - `entities`: table definitions (migrations are owned externally)
//! - `config`: TOML + env configuration
//! - `runtime`: logging and server bootstrap

pub mod api;
pub mod config;
pub mod entities;
pub mod errors;
pub mod object_store;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
