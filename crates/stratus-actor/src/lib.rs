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

//! Actions composed from control-plane requests.
//!
//! Every operation takes a `&mut Warnings` accumulator so callers can show
//! advisory messages from all underlying requests, including the ones made
//! before a failure.

mod actor;
mod applications;
mod deployments;
mod error;
mod logs;
mod organizations;
mod quotas;
mod revisions;
mod staging;

pub use actor::{Actor, ActorConfig, Phase, RevisionLookup};
pub use error::{ActorError, ActorResult};
pub use logs::{LogMessage, LogStreamHandle};
pub use stratus_client::{DeploymentSource, Warnings};
