//! Domain logic for the Caravel booking backend.
//!
//! This crate has no database or HTTP dependencies so the persistence and
//! API layers (and any future CLI tooling) can share it freely.

pub mod error;
pub mod localization;
pub mod media;
pub mod types;
pub mod verification;
