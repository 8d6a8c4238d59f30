#![forbid(unsafe_code)]
//! larder-sweep library.
//!
//! The recurring expiry sweep: walks every household's items, recomputes
//! freshness from the stored expiry dates, persists changes, and raises
//! deduplicated alerts. [`scheduler::SweepScheduler`] owns the worker
//! thread; [`sweep::run_once`] is the synchronous entry point.
//!
//! # Conventions
//!
//! - **Errors**: only the outer household enumeration fails a run; per-item
//!   and per-alert failures are logged and absorbed.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod scheduler;
pub mod sweep;
