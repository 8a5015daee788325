//! Core domain types for sigbadge.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod request;
pub mod types;
