//! # Elephant Server
//!
//! Translation layer between JSON requests carrying physical units and the
//! domain objects consumed by spike-train and signal analysis functions.
//!
//! ## Architecture
//!
//! - [`units`]: unit parsing, dimensions and the per-request [`units::UnitRegistry`]
//! - [`models`]: quantities, spike trains, signals and the in-process value tree
//! - [`codec`]: JSON → domain deserialization and domain → JSON serialization
//! - [`dispatch`]: the static callable table and the call round trip
//! - [`analysis`]: built-in analysis functions
//! - [`config`]: server configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`client`]: async HTTP client for a running server
//!
//! ## Example
//!
//! ```
//! use elephant_server::dispatch::{CallableRegistry, Dispatcher};
//! use serde_json::json;
//!
//! let registry = CallableRegistry::with_builtins();
//! let out = Dispatcher::new(&registry)
//!     .handle(
//!         "statistics",
//!         "isi",
//!         json!({"data": {"spiketrain": [1.0, 1.5, 4.0]}, "units": {"time": "ms"}}),
//!     )
//!     .unwrap();
//! assert_eq!(out, json!([0.5, 2.5]));
//! ```

pub mod analysis;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod units;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "client")]
pub mod client;
