//! IKnow API client library
//!
//! An async client for the IKnow REST API, plus the lazily loaded materials
//! tree (university, school, department, year, semester, material) and the
//! nested comment thread built on top of it.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod thread;
pub mod tree;

mod client;

pub use client::*;
