//! # defender-api
//!
//! Authenticated query client for the Microsoft Defender API.
//! Acquires tokens via the OAuth client-credential grant, issues
//! read-only GET queries against the alert and device endpoints, and
//! formats the responses for console display.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod format;

pub use auth::{ClientCredentialTokenSource, StaticTokenSource, TokenSource};
pub use client::{AlertQuery, DefenderClient};
pub use config::DefenderConfig;
pub use error::{ApiError, Result};
pub use format::{format_alerts, format_devices};
