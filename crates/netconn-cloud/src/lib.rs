//! netconn cloud networking abstraction
//!
//! This crate defines the provider-neutral surface the provisioning engine
//! talks to: a per-request [`NetworkClient`] session opened through a
//! [`NetworkClientFactory`], and the resource types that flow through it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              netconn (NATS worker)               │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 netconn-core                     │
//! │      envelope / validation / engine              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                netconn-cloud                     │
//! │  trait NetworkClientFactory { connect(..) }      │
//! │  trait NetworkClient { create_subnet(..) ... }   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │      aws      │
//!           │  (EC2 API)    │
//!           └───────────────┘
//! ```

pub mod client;
pub mod error;
pub mod resource;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use client::{Credentials, NetworkClient, NetworkClientFactory};
pub use error::{CloudError, Result};
pub use resource::{
    DEFAULT_ROUTE_CIDR, InternetGateway, NetworkInterface, ResourceFilter, RouteSpec, RouteTable,
    Subnet, SubnetSpec,
};
