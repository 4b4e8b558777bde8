//! Release version metadata served from a config bucket
//!
//! This module fetches the versions manifest and per-release bills of
//! materials from an object store, maps them into typed records, and caches
//! the two "latest" scalars for a bounded window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ ObjectStore │────▶│  Document   │────▶│   Service   │
//! │   (fetch)   │     │(yaml → type)│     │  (lookups)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │   Stores    │                         │    Cache    │
//! │   (http)    │                         │ (ttl, keys) │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: In-memory cache with a fixed per-entry time-to-live
//! - [`document`]: YAML parsing and relaxed mapping into records
//! - [`error`]: Error types for stores, documents and the service
//! - [`semver`]: Version comparison used for update checks
//! - [`service`]: `VersionsService`, the public entry point
//! - [`store`]: `ObjectStore` trait and path conventions
//! - [`stores`]: Concrete object store adapters
//! - [`types`]: `Versions` and `BillOfMaterials` records

pub mod cache;
pub mod document;
pub mod error;
pub mod semver;
pub mod service;
pub mod store;
pub mod stores;
pub mod types;
