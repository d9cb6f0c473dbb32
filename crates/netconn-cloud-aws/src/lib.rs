//! AWS EC2 provider for netconn
//!
//! This crate implements the `NetworkClientFactory` and `NetworkClient`
//! traits on top of the official AWS SDK, so the provisioning engine can
//! manage subnets, internet gateways, route tables and network interfaces
//! in a VPC.
//!
//! # Authentication
//!
//! Every request carries its own region, access key and access token. A new
//! SDK client is built from those static credentials for each request; the
//! shared AWS profile and environment credentials are never consulted.
//!
//! # Example
//!
//! ```ignore
//! use netconn_cloud::{Credentials, NetworkClientFactory, SubnetSpec};
//! use netconn_cloud_aws::Ec2ClientFactory;
//!
//! let factory = Ec2ClientFactory::new();
//! let client = factory
//!     .connect(&Credentials::new("eu-west-1", "AKIA...", "secret"))
//!     .await?;
//!
//! let subnet = client
//!     .create_subnet(&SubnetSpec::new("vpc-0123", "10.0.1.0/24", ""))
//!     .await?;
//! ```

mod error;
pub mod provider;

pub use provider::{Ec2ClientFactory, Ec2NetworkClient};
