//! Neon API client library for Rust.
//!
//! A blocking client for the [Neon API](https://api-docs.neon.tech/reference/getting-started-with-neon-api).
//! It covers API keys, the current user, projects and branches. Responses
//! come back as [`Resource`] values: the raw JSON plus a typed view that is
//! built on first access.
//!
//! # Quick Start
//!
//! ```no_run
//! use neon_client::{ListProjectsParams, NeonClient};
//!
//! // Reads NEON_API_KEY
//! let client = NeonClient::from_environ().unwrap();
//!
//! let projects = client
//!     .projects(&ListProjectsParams {
//!         limit: Some(10),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! for p in &projects {
//!     println!("{:?}: {:?}", p.id, p.name);
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod resource;
pub mod resources;

// Re-export the main public types at the crate root for convenience.
pub use client::{
    compact_query, url_join, NeonClient, RequestOptions, NEON_API_BASE_URL, NEON_API_KEY_ENVIRON,
    USER_AGENT, VERSION,
};
pub use error::NeonError;
pub use models::{
    ApiKeyCreateRequest, ApiKeyCreateResponse, ApiKeyRevokeResponse, ApiKeysListResponseItem,
    BranchCreateRequest, BranchCreateRequestBranch, BranchCreateRequestEndpointOptions,
    BranchResponse, CurrentUserInfoResponse, EndpointType, ProjectListItem,
};
pub use resource::{Resource, Schema};
pub use resources::{
    ApiKey, ApiKeyId, Branch, ListBranchesParams, ListProjectsParams, Operation, Project, User,
};
