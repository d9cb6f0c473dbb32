//! Cloud networking capability traits

use crate::error::Result;
use crate::resource::{
    InternetGateway, NetworkInterface, ResourceFilter, RouteSpec, RouteTable, Subnet, SubnetSpec,
};
use async_trait::async_trait;
use std::fmt;

/// Networking operations against one provider account and region.
///
/// A client is bound to the credentials it was opened with and lives for a
/// single request. Implementations perform exactly one provider call per
/// method and never retry.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Create a subnet and return its provider id and resolved zone
    async fn create_subnet(&self, spec: &SubnetSpec) -> Result<Subnet>;

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;

    /// Turn on public address assignment for instances launched in the subnet
    async fn map_public_ip_on_launch(&self, subnet_id: &str) -> Result<()>;

    async fn describe_internet_gateways(
        &self,
        filters: &[ResourceFilter],
    ) -> Result<Vec<InternetGateway>>;

    async fn create_internet_gateway(&self) -> Result<InternetGateway>;

    async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()>;

    async fn describe_route_tables(&self, filters: &[ResourceFilter]) -> Result<Vec<RouteTable>>;

    async fn create_route_table(&self, vpc_id: &str) -> Result<RouteTable>;

    async fn associate_route_table(&self, route_table_id: &str, subnet_id: &str) -> Result<()>;

    async fn create_route(&self, route: &RouteSpec) -> Result<()>;

    async fn describe_network_interfaces(
        &self,
        filters: &[ResourceFilter],
    ) -> Result<Vec<NetworkInterface>>;
}

/// Opens a fresh [`NetworkClient`] session per request.
///
/// Sessions are never pooled: credentials arrive on every event and are
/// short-lived.
#[async_trait]
pub trait NetworkClientFactory: Send + Sync {
    /// Returns the provider name (e.g., "aws")
    fn provider(&self) -> &str;

    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn NetworkClient>>;
}

/// Per-request provider credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub region: String,
    pub access_key: String,
    pub access_token: String,
}

impl Credentials {
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            access_key: access_key.into(),
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("region", &self.region)
            .field("access_key", &"** redacted **")
            .field("access_token", &"** redacted **")
            .finish()
    }
}
