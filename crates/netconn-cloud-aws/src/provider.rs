//! EC2 networking provider implementation

use crate::error::{api_error, missing};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::{AttributeBooleanValue, Filter};
use netconn_cloud::{
    Credentials, InternetGateway, NetworkClient, NetworkClientFactory, NetworkInterface,
    ResourceFilter, Result, RouteSpec, RouteTable, Subnet, SubnetSpec,
};

/// Name the static credentials are registered under in the SDK
const CREDENTIALS_PROVIDER: &str = "netconn-event";

/// Opens one EC2 client per request from the credentials carried on the event
#[derive(Debug, Clone, Default)]
pub struct Ec2ClientFactory;

impl Ec2ClientFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NetworkClientFactory for Ec2ClientFactory {
    fn provider(&self) -> &str {
        "aws"
    }

    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn NetworkClient>> {
        Ok(Box::new(Ec2NetworkClient::connect(credentials).await))
    }
}

/// EC2 networking client bound to one region and one set of credentials
pub struct Ec2NetworkClient {
    client: Client,
}

impl Ec2NetworkClient {
    /// Build a client from static per-request credentials.
    ///
    /// Region and credentials always come from the event. Other shared SDK
    /// settings (endpoint URL, retry mode, FIPS/dual-stack) are still loaded
    /// from the environment and AWS profile files.
    pub async fn connect(credentials: &Credentials) -> Self {
        let static_credentials = aws_sdk_ec2::config::Credentials::new(
            credentials.access_key.clone(),
            credentials.access_token.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .credentials_provider(static_credentials)
            .load()
            .await;

        tracing::debug!("Opened EC2 session in {}", credentials.region);

        Self {
            client: Client::new(&config),
        }
    }
}

/// Convert provider-neutral filters into EC2 filters
fn to_ec2_filters(filters: &[ResourceFilter]) -> Vec<Filter> {
    filters
        .iter()
        .map(|f| {
            Filter::builder()
                .name(&f.name)
                .set_values(Some(f.values.clone()))
                .build()
        })
        .collect()
}

#[async_trait]
impl NetworkClient for Ec2NetworkClient {
    async fn create_subnet(&self, spec: &SubnetSpec) -> Result<Subnet> {
        tracing::debug!("CreateSubnet {} in {}", spec.cidr_block, spec.vpc_id);

        let output = self
            .client
            .create_subnet()
            .vpc_id(&spec.vpc_id)
            .cidr_block(&spec.cidr_block)
            .set_availability_zone(spec.availability_zone.clone())
            .send()
            .await
            .map_err(api_error)?;

        let subnet = output.subnet().ok_or_else(|| missing("subnet"))?;
        Ok(Subnet {
            id: subnet
                .subnet_id()
                .ok_or_else(|| missing("subnet id"))?
                .to_string(),
            availability_zone: subnet.availability_zone().unwrap_or_default().to_string(),
        })
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        tracing::debug!("DeleteSubnet {}", subnet_id);

        self.client
            .delete_subnet()
            .subnet_id(subnet_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn map_public_ip_on_launch(&self, subnet_id: &str) -> Result<()> {
        tracing::debug!("ModifySubnetAttribute {} MapPublicIpOnLaunch=true", subnet_id);

        self.client
            .modify_subnet_attribute()
            .subnet_id(subnet_id)
            .map_public_ip_on_launch(AttributeBooleanValue::builder().value(true).build())
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn describe_internet_gateways(
        &self,
        filters: &[ResourceFilter],
    ) -> Result<Vec<InternetGateway>> {
        let output = self
            .client
            .describe_internet_gateways()
            .set_filters(Some(to_ec2_filters(filters)))
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .internet_gateways()
            .iter()
            .filter_map(|g| g.internet_gateway_id())
            .map(|id| InternetGateway { id: id.to_string() })
            .collect())
    }

    async fn create_internet_gateway(&self) -> Result<InternetGateway> {
        let output = self
            .client
            .create_internet_gateway()
            .send()
            .await
            .map_err(api_error)?;

        let id = output
            .internet_gateway()
            .and_then(|g| g.internet_gateway_id())
            .ok_or_else(|| missing("internet gateway id"))?;
        Ok(InternetGateway { id: id.to_string() })
    }

    async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        tracing::debug!("AttachInternetGateway {} to {}", gateway_id, vpc_id);

        self.client
            .attach_internet_gateway()
            .internet_gateway_id(gateway_id)
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn describe_route_tables(&self, filters: &[ResourceFilter]) -> Result<Vec<RouteTable>> {
        let output = self
            .client
            .describe_route_tables()
            .set_filters(Some(to_ec2_filters(filters)))
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .route_tables()
            .iter()
            .filter_map(|t| t.route_table_id())
            .map(|id| RouteTable { id: id.to_string() })
            .collect())
    }

    async fn create_route_table(&self, vpc_id: &str) -> Result<RouteTable> {
        let output = self
            .client
            .create_route_table()
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(api_error)?;

        let id = output
            .route_table()
            .and_then(|t| t.route_table_id())
            .ok_or_else(|| missing("route table id"))?;
        Ok(RouteTable { id: id.to_string() })
    }

    async fn associate_route_table(&self, route_table_id: &str, subnet_id: &str) -> Result<()> {
        tracing::debug!("AssociateRouteTable {} with {}", route_table_id, subnet_id);

        self.client
            .associate_route_table()
            .route_table_id(route_table_id)
            .subnet_id(subnet_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn create_route(&self, route: &RouteSpec) -> Result<()> {
        tracing::debug!(
            "CreateRoute {} -> {} in {}",
            route.destination_cidr_block,
            route.gateway_id,
            route.route_table_id
        );

        self.client
            .create_route()
            .route_table_id(&route.route_table_id)
            .destination_cidr_block(&route.destination_cidr_block)
            .gateway_id(&route.gateway_id)
            .send()
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn describe_network_interfaces(
        &self,
        filters: &[ResourceFilter],
    ) -> Result<Vec<NetworkInterface>> {
        let output = self
            .client
            .describe_network_interfaces()
            .set_filters(Some(to_ec2_filters(filters)))
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .network_interfaces()
            .iter()
            .filter_map(|i| i.network_interface_id())
            .map(|id| NetworkInterface { id: id.to_string() })
            .collect())
    }
}
