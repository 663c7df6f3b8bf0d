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

//! Shared test helpers used across the workspace suites.
//! Layout: fixtures.rs (API JSON builders), tokens.rs (unsigned access tokens).

pub mod fixtures;
pub mod tokens;
