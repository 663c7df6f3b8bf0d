#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! REST client for the Stratus control-plane API.
//!
//! Layout:
//! - `request.rs`: named endpoints, URI templates, and query filters
//! - `client.rs`: connection setup, request execution, and pagination
//! - `error.rs` / `warnings.rs`: error mapping and `X-Cf-Warnings` handling
//! - resource modules (`applications.rs`, `revisions.rs`, ...): typed endpoint wrappers
//! - `log_cache.rs`: log cache reader used for streaming application logs

mod applications;
mod builds;
mod client;
mod deployments;
mod error;
mod log_cache;
mod organization_quotas;
mod organizations;
mod processes;
mod request;
mod revisions;
mod root;
mod warnings;

pub use client::{ClientConfig, CloudControllerClient};
pub use deployments::DeploymentSource;
pub use error::{ClientError, ClientResult, MultiError};
pub use log_cache::{HttpLogCacheClient, LogCacheClient};
pub use request::{Query, QueryKey, RequestName, RequestParams};
pub use warnings::{WARNINGS_HEADER, Warnings};
