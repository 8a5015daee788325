//! GnuPG-backed trust store priming and detached signature verification.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod primer;
pub mod scratch;
pub mod trust_store;
pub mod verifier;
