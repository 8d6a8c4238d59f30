#![forbid(unsafe_code)]
//! larder-core library.
//!
//! Domain model and storage for household grocery freshness tracking:
//! items with shelf lives, the freshness calculator, subscription plans,
//! and the SQLite-backed inventory and alert stores.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` at the edges, typed errors (`StoreError`,
//!   `ValidationError`) inside the storage and model layers.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod alerts;
pub mod clock;
pub mod config;
pub mod db;
pub mod freshness;
pub mod model;
pub mod store;
