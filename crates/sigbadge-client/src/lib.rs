//! HTTP fetcher for documents, detached signatures and key material.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
