//! In-memory [`NetworkClient`] that records every call
//!
//! Enabled for downstream crates with the `test-utils` feature.

use crate::client::{Credentials, NetworkClient, NetworkClientFactory};
use crate::error::{CloudError, Result};
use crate::resource::{
    InternetGateway, NetworkInterface, ResourceFilter, RouteSpec, RouteTable, Subnet, SubnetSpec,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Zone reported for subnets created without an explicit zone
pub const DEFAULT_ZONE: &str = "eu-west-1a";

/// A recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateSubnet(SubnetSpec),
    DeleteSubnet(String),
    MapPublicIpOnLaunch(String),
    DescribeInternetGateways(Vec<ResourceFilter>),
    CreateInternetGateway,
    AttachInternetGateway { gateway_id: String, vpc_id: String },
    DescribeRouteTables(Vec<ResourceFilter>),
    CreateRouteTable(String),
    AssociateRouteTable { route_table_id: String, subnet_id: String },
    CreateRoute(RouteSpec),
    DescribeNetworkInterfaces(Vec<ResourceFilter>),
}

impl Call {
    /// Operation name, matching the EC2 action name
    pub fn name(&self) -> &'static str {
        match self {
            Call::CreateSubnet(_) => "CreateSubnet",
            Call::DeleteSubnet(_) => "DeleteSubnet",
            Call::MapPublicIpOnLaunch(_) => "ModifySubnetAttribute",
            Call::DescribeInternetGateways(_) => "DescribeInternetGateways",
            Call::CreateInternetGateway => "CreateInternetGateway",
            Call::AttachInternetGateway { .. } => "AttachInternetGateway",
            Call::DescribeRouteTables(_) => "DescribeRouteTables",
            Call::CreateRouteTable(_) => "CreateRouteTable",
            Call::AssociateRouteTable { .. } => "AssociateRouteTable",
            Call::CreateRoute(_) => "CreateRoute",
            Call::DescribeNetworkInterfaces(_) => "DescribeNetworkInterfaces",
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<Call>,
    connections: Vec<Credentials>,
    existing_gateway: Option<InternetGateway>,
    existing_route_table: Option<RouteTable>,
    interface_polls: VecDeque<usize>,
    failure: Option<(&'static str, String)>,
    created: u32,
}

/// Recording fake for the whole networking surface.
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another through the factory.
#[derive(Debug, Clone, Default)]
pub struct FakeNetwork {
    state: Arc<Mutex<FakeState>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an already attached gateway from `DescribeInternetGateways`
    pub fn with_gateway(self, id: impl Into<String>) -> Self {
        self.lock().existing_gateway = Some(InternetGateway { id: id.into() });
        self
    }

    /// Report an already associated route table from `DescribeRouteTables`
    pub fn with_route_table(self, id: impl Into<String>) -> Self {
        self.lock().existing_route_table = Some(RouteTable { id: id.into() });
        self
    }

    /// Interface counts returned by successive `DescribeNetworkInterfaces`
    /// calls; once exhausted the subnet reports no interfaces.
    pub fn with_interface_polls(self, counts: impl IntoIterator<Item = usize>) -> Self {
        self.lock().interface_polls = counts.into_iter().collect();
        self
    }

    /// Keep reporting one attached interface forever
    pub fn with_stuck_interface(self) -> Self {
        self.lock().interface_polls = VecDeque::from(vec![1; 1024]);
        self
    }

    /// Fail the named operation (see [`Call::name`]) with an API error
    pub fn failing_on(self, operation: &'static str, message: impl Into<String>) -> Self {
        self.lock().failure = Some((operation, message.into()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.lock().calls.iter().map(Call::name).collect()
    }

    /// Credentials of every session opened through the factory
    pub fn connections(&self) -> Vec<Credentials> {
        self.lock().connections.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut state = self.lock();
        let name = call.name();
        state.calls.push(call);
        match &state.failure {
            Some((operation, message)) if *operation == name => {
                Err(CloudError::ApiError(message.clone()))
            }
            _ => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.lock();
        state.created += 1;
        format!("{}-{:08x}", prefix, state.created)
    }
}

#[async_trait]
impl NetworkClientFactory for FakeNetwork {
    fn provider(&self) -> &str {
        "fake"
    }

    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn NetworkClient>> {
        self.lock().connections.push(credentials.clone());
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl NetworkClient for FakeNetwork {
    async fn create_subnet(&self, spec: &SubnetSpec) -> Result<Subnet> {
        self.record(Call::CreateSubnet(spec.clone()))?;
        Ok(Subnet {
            id: self.next_id("subnet"),
            availability_zone: spec
                .availability_zone
                .clone()
                .unwrap_or_else(|| DEFAULT_ZONE.to_string()),
        })
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.record(Call::DeleteSubnet(subnet_id.to_string()))
    }

    async fn map_public_ip_on_launch(&self, subnet_id: &str) -> Result<()> {
        self.record(Call::MapPublicIpOnLaunch(subnet_id.to_string()))
    }

    async fn describe_internet_gateways(
        &self,
        filters: &[ResourceFilter],
    ) -> Result<Vec<InternetGateway>> {
        self.record(Call::DescribeInternetGateways(filters.to_vec()))?;
        Ok(self.lock().existing_gateway.clone().into_iter().collect())
    }

    async fn create_internet_gateway(&self) -> Result<InternetGateway> {
        self.record(Call::CreateInternetGateway)?;
        Ok(InternetGateway {
            id: self.next_id("igw"),
        })
    }

    async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.record(Call::AttachInternetGateway {
            gateway_id: gateway_id.to_string(),
            vpc_id: vpc_id.to_string(),
        })
    }

    async fn describe_route_tables(&self, filters: &[ResourceFilter]) -> Result<Vec<RouteTable>> {
        self.record(Call::DescribeRouteTables(filters.to_vec()))?;
        Ok(self.lock().existing_route_table.clone().into_iter().collect())
    }

    async fn create_route_table(&self, vpc_id: &str) -> Result<RouteTable> {
        self.record(Call::CreateRouteTable(vpc_id.to_string()))?;
        Ok(RouteTable {
            id: self.next_id("rtb"),
        })
    }

    async fn associate_route_table(&self, route_table_id: &str, subnet_id: &str) -> Result<()> {
        self.record(Call::AssociateRouteTable {
            route_table_id: route_table_id.to_string(),
            subnet_id: subnet_id.to_string(),
        })
    }

    async fn create_route(&self, route: &RouteSpec) -> Result<()> {
        self.record(Call::CreateRoute(route.clone()))
    }

    async fn describe_network_interfaces(
        &self,
        filters: &[ResourceFilter],
    ) -> Result<Vec<NetworkInterface>> {
        self.record(Call::DescribeNetworkInterfaces(filters.to_vec()))?;
        let count = self.lock().interface_polls.pop_front().unwrap_or(0);
        Ok((0..count)
            .map(|i| NetworkInterface {
                id: format!("eni-{:08x}", i),
            })
            .collect())
    }
}
