//! Wait for network interfaces to leave a subnet
//!
//! The provider refuses to delete a subnet that still has interfaces
//! attached, so deletion polls until the subnet is empty. Interfaces owned by
//! other resources (load balancers, NAT devices) have to be removed
//! out-of-band; by default the wait has no upper bound.

use netconn_cloud::{CloudError, NetworkClient, ResourceFilter, Result};
use std::time::Duration;
use tokio::time::sleep;

/// Polling settings for [`wait_for_interface_removal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between polls
    pub interval: Duration,
    /// Give up after this many polls; `None` waits forever
    pub max_attempts: Option<u32>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// Block until no network interface remains in `subnet_id`
///
/// # Returns
/// * `Ok(())` - the subnet has no interfaces left
/// * `Err(CloudError)` - a describe call failed, or `max_attempts` polls all
///   still saw interfaces
pub async fn wait_for_interface_removal(
    client: &dyn NetworkClient,
    subnet_id: &str,
    config: &WaitConfig,
) -> Result<()> {
    let filters = [ResourceFilter::in_subnet(subnet_id)];
    let mut attempts: u32 = 0;

    loop {
        let interfaces = client.describe_network_interfaces(&filters).await?;
        attempts = next_attempt(attempts);

        if interfaces.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            subnet = %subnet_id,
            remaining = interfaces.len(),
            attempt = attempts,
            "Waiting for network interfaces to detach"
        );

        if let Some(max_attempts) = config.max_attempts {
            if attempts >= max_attempts {
                return Err(CloudError::Timeout(format!(
                    "timed out waiting for network interfaces to detach from {} after {} attempts",
                    subnet_id, attempts
                )));
            }
        }

        sleep(config.interval).await;
    }
}

/// Attempt counter; pins at `u32::MAX` on an unbounded wait
fn next_attempt(attempts: u32) -> u32 {
    attempts.saturating_add(1)
}
