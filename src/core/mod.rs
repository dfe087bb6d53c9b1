//! Core library components.
//!
//! This module contains the encryption engine: primitives, the `.env`
//! field codec, identity storage and project orchestration.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod env;
pub mod file;
pub mod project;
pub mod store;
pub mod types;
