//! HTTP handlers.

pub mod verify;
