//! SkyPortal Client - state synchronization for the SkyPortal web portal
//!
//! This crate keeps a local, immutable snapshot of portal data in sync with
//! the server: REST calls report through a reducer-driven store, and server
//! pushes over a WebSocket trigger targeted refetches.

pub mod api;
pub mod api_client;
pub mod config;
pub mod context;
pub mod portal;
pub mod resources;
pub mod store;
pub mod ws;

pub use api::ApiResponse;
pub use api_client::ApiClient;
pub use config::PortalConfig;
pub use context::ActionContext;
pub use portal::Portal;
pub use store::{Action, Reducer, RootState, Store};
pub use ws::{ConnectionState, Effect, MessageHandler, WsConnection};
