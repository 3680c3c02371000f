//! Core components of the `tomorrow-proxy` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The upstream [`TomorrowClient`] and its builder.
//! - The primary [`ProxyError`] type.
//! - The single-slot [`FreshnessCache`].
//! - The backoff fetch loop against the timelines endpoint.

/// Single-slot TTL cache for the last successful upstream payload.
pub mod cache;
/// The upstream client (`TomorrowClient`), builder, and retry configuration.
pub mod client;
/// The primary error type (`ProxyError`) for the crate.
pub mod error;
/// The retrying fetch against the Tomorrow.io timelines endpoint.
pub mod timelines;

// convenient re-exports so most code can just `use crate::core::TomorrowClient`
pub use cache::{CacheEntry, FreshnessCache};
pub use client::{Backoff, RetryConfig, TomorrowClient, TomorrowClientBuilder};
pub use error::ProxyError;
pub use timelines::fetch_timelines;
