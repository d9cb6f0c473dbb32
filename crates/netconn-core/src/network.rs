//! Subnet create and delete sequences
//!
//! Every step aborts the sequence on failure. Nothing is rolled back: a
//! subnet or gateway created before a failing step stays in the account.

use crate::event::EventEnvelope;
use crate::waiter::{WaitConfig, wait_for_interface_removal};
use netconn_cloud::{InternetGateway, NetworkClient, ResourceFilter, Result, RouteSpec, RouteTable};

/// Create the subnet described by `event` and, for public subnets, route it
/// to the internet. On success the assigned subnet id and resolved zone are
/// written back to the event.
pub async fn create_network(client: &dyn NetworkClient, event: &mut EventEnvelope) -> Result<()> {
    let subnet = client.create_subnet(&event.subnet_spec()).await?;
    tracing::info!(
        vpc = %event.vpc_id,
        subnet = %subnet.id,
        zone = %subnet.availability_zone,
        "Created subnet {}",
        event.subnet
    );

    if event.is_public {
        let gateway = ensure_internet_gateway(client, &event.vpc_id).await?;
        let route_table = ensure_route_table(client, &event.vpc_id, &subnet.id).await?;

        // Not idempotent: fails if the table already routes 0.0.0.0/0
        let route = RouteSpec::default_route(&route_table.id, &gateway.id);
        client.create_route(&route).await?;
        tracing::info!(
            route_table = %route_table.id,
            gateway = %gateway.id,
            "Created route {}",
            route.destination_cidr_block
        );

        client.map_public_ip_on_launch(&subnet.id).await?;
    }

    event.network_aws_id = subnet.id;
    event.availability_zone = subnet.availability_zone;
    Ok(())
}

/// Delete the subnet named by `event.network_aws_id` once it has no
/// network interfaces left
pub async fn delete_network(
    client: &dyn NetworkClient,
    event: &EventEnvelope,
    wait: &WaitConfig,
) -> Result<()> {
    wait_for_interface_removal(client, &event.network_aws_id, wait).await?;

    client.delete_subnet(&event.network_aws_id).await?;
    tracing::info!(subnet = %event.network_aws_id, "Deleted subnet");
    Ok(())
}

/// Reuse the gateway attached to the VPC, or create and attach one.
///
/// Lookup and creation are not atomic; two concurrent creates in the same
/// VPC can both miss and both create.
async fn ensure_internet_gateway(client: &dyn NetworkClient, vpc_id: &str) -> Result<InternetGateway> {
    let existing = client
        .describe_internet_gateways(&[ResourceFilter::attached_to_vpc(vpc_id)])
        .await?;

    if let Some(gateway) = existing.into_iter().next() {
        tracing::debug!(vpc = %vpc_id, gateway = %gateway.id, "Reusing internet gateway");
        return Ok(gateway);
    }

    let gateway = client.create_internet_gateway().await?;
    client.attach_internet_gateway(&gateway.id, vpc_id).await?;
    tracing::info!(vpc = %vpc_id, gateway = %gateway.id, "Created internet gateway");
    Ok(gateway)
}

/// Reuse the route table associated with the subnet, or create and
/// associate one
async fn ensure_route_table(
    client: &dyn NetworkClient,
    vpc_id: &str,
    subnet_id: &str,
) -> Result<RouteTable> {
    let existing = client
        .describe_route_tables(&[ResourceFilter::associated_with_subnet(subnet_id)])
        .await?;

    if let Some(route_table) = existing.into_iter().next() {
        tracing::debug!(subnet = %subnet_id, route_table = %route_table.id, "Reusing route table");
        return Ok(route_table);
    }

    let route_table = client.create_route_table(vpc_id).await?;
    client.associate_route_table(&route_table.id, subnet_id).await?;
    tracing::info!(subnet = %subnet_id, route_table = %route_table.id, "Created route table");
    Ok(route_table)
}
