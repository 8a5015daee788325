//! sigbadge verification badge server library.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod badge;
pub mod config;
pub mod handlers;
pub mod router;
