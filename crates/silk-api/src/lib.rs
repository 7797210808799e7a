//! # Silk-API
//!
//! HTTP and WebSocket surface for Silkflow, plus the state
//! synchronization core behind it.
//!
//! ## Endpoints
//!
//! ### REST
//! - `POST /api/gesture/analyze` - classify a landmark frame and apply it
//! - `POST /api/particle/update` - apply a direct particle update
//! - `POST /api/color/change` - change the color theme
//! - `GET /health` - health check
//!
//! ### Streaming
//! - `GET /ws?room=<name>` - per-viewer bidirectional channel; every
//!   inbound message is acknowledged and every applied state update is
//!   fanned out as a `state-sync` message
//!
//! ## Synchronization model
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `registry` | session lifecycle and failure-isolated broadcast |
//! | `room` | single-writer pipeline per room, total state order |
//! | `gateway` | WebSocket accept/ack/teardown |

pub mod config;
pub mod gateway;
pub mod handlers;
pub mod messages;
pub mod registry;
pub mod room;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use server::serve;
pub use state::AppState;
