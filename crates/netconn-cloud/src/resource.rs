//! Networking resource types shared by all providers

/// Destination of the default route that makes a subnet internet-reachable
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// Request for a new subnet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetSpec {
    pub vpc_id: String,
    pub cidr_block: String,
    /// `None` lets the provider pick a zone
    pub availability_zone: Option<String>,
}

impl SubnetSpec {
    /// Build a spec, treating an empty zone as "provider default"
    pub fn new(
        vpc_id: impl Into<String>,
        cidr_block: impl Into<String>,
        availability_zone: impl Into<String>,
    ) -> Self {
        let availability_zone = availability_zone.into();
        Self {
            vpc_id: vpc_id.into(),
            cidr_block: cidr_block.into(),
            availability_zone: if availability_zone.is_empty() {
                None
            } else {
                Some(availability_zone)
            },
        }
    }
}

/// A created subnet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub id: String,
    pub availability_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetGateway {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub id: String,
}

/// A route sending `destination_cidr_block` through a gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub route_table_id: String,
    pub destination_cidr_block: String,
    pub gateway_id: String,
}

impl RouteSpec {
    /// Default route (`0.0.0.0/0`) through the given gateway
    pub fn default_route(route_table_id: impl Into<String>, gateway_id: impl Into<String>) -> Self {
        Self {
            route_table_id: route_table_id.into(),
            destination_cidr_block: DEFAULT_ROUTE_CIDR.to_string(),
            gateway_id: gateway_id.into(),
        }
    }
}

/// Name/values filter for describe calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter {
    pub name: String,
    pub values: Vec<String>,
}

impl ResourceFilter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Gateways attached to the VPC
    pub fn attached_to_vpc(vpc_id: impl Into<String>) -> Self {
        Self::new("attachment.vpc-id", vpc_id)
    }

    /// Route tables associated with the subnet
    pub fn associated_with_subnet(subnet_id: impl Into<String>) -> Self {
        Self::new("association.subnet-id", subnet_id)
    }

    /// Network interfaces living in the subnet
    pub fn in_subnet(subnet_id: impl Into<String>) -> Self {
        Self::new("subnet-id", subnet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_zone_means_provider_default() {
        let spec = SubnetSpec::new("vpc-0000000", "10.0.0.0/16", "");
        assert_eq!(spec.availability_zone, None);

        let spec = SubnetSpec::new("vpc-0000000", "10.0.0.0/16", "eu-west-1b");
        assert_eq!(spec.availability_zone.as_deref(), Some("eu-west-1b"));
    }

    #[test]
    fn test_filters() {
        assert_eq!(
            ResourceFilter::attached_to_vpc("vpc-1"),
            ResourceFilter {
                name: "attachment.vpc-id".to_string(),
                values: vec!["vpc-1".to_string()],
            }
        );
        assert_eq!(
            ResourceFilter::associated_with_subnet("subnet-1").name,
            "association.subnet-id"
        );
        assert_eq!(ResourceFilter::in_subnet("subnet-1").name, "subnet-id");
    }

    #[test]
    fn test_default_route() {
        let route = RouteSpec::default_route("rtb-1", "igw-1");
        assert_eq!(route.destination_cidr_block, "0.0.0.0/0");
        assert_eq!(route.route_table_id, "rtb-1");
        assert_eq!(route.gateway_id, "igw-1");
    }
}
