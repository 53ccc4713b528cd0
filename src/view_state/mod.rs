//! Screen controllers. Plain Rust over [`crate::services`], so every request
//! lifecycle here runs under `cargo test` without a browser.

pub mod auth;
pub mod create_recipe;
pub mod profile;
pub mod upload;
