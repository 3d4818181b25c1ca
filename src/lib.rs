//! searchd-client - Client-side search orchestration.
//!
//! This library sits between application code and a remote full-text search
//! daemon speaking the searchd binary protocol. It resolves logical index
//! labels to physical index lists, validates per-query options, executes
//! searches (single or batched), decodes per-field match information from
//! field-mask weights, and maps raw result rows into typed results -
//! optionally hydrated into caller-supplied domain objects ordered by
//! relevance. The daemon connection itself is pluggable behind the
//! [`backend::SearchBackend`] trait.
//!
//! The daemon session is a single shared stateful resource: one client
//! instance supports one in-flight logical search at a time, and concurrent
//! callers must serialize access (one client per worker, or an external
//! queue).
//!
//! # Modules
//!
//! - [`backend`] - Daemon session trait and wire-shaped value types
//! - [`client`] - High-level search client and orchestration pipeline
//! - [`config`] - Configuration loading
//! - [`fieldmask`] - Per-field match decoding
//! - [`hydrate`] - Entity hydration and result ordering
//! - [`index`] - Logical index label resolution
//! - [`options`] - Per-call search options and validation

pub mod backend;
pub mod client;
pub mod config;
pub mod fieldmask;
pub mod hydrate;
pub mod index;
pub mod options;
