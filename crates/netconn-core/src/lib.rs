//! netconn core
//!
//! Decodes network events, validates them and drives the subnet lifecycle
//! through a [`netconn_cloud::NetworkClient`].
//!
//! ```text
//! subject + payload
//!        │
//!        ▼
//!  EventEnvelope::decode ──(malformed)──▶ raw payload to <subject>.error
//!        │
//!        ▼
//!  validate ──(invalid)──▶ <subject>.error
//!        │
//!        ▼
//!  create / delete / update / get
//!        │
//!        ▼
//!  <subject>.done  or  <subject>.error
//! ```

pub mod action;
pub mod bus;
pub mod engine;
pub mod error;
pub mod event;
pub mod network;
pub mod waiter;

pub use action::Action;
pub use bus::{MessagePublisher, done_topic, error_topic};
pub use engine::{Outcome, ProvisioningEngine};
pub use error::{EventError, Result, ValidationError};
pub use event::{EventEnvelope, PROVIDER_TYPE};
pub use network::{create_network, delete_network};
pub use waiter::{WaitConfig, wait_for_interface_removal};
