//! Network event envelope
//!
//! The envelope is both the request and the response: it is decoded from the
//! inbound payload, filled in by the handler, and published back unchanged
//! apart from the result fields.

use crate::action::Action;
use crate::bus::{MessagePublisher, done_topic, error_topic};
use crate::error::{EventError, Result, ValidationError};
use netconn_cloud::{Credentials, SubnetSpec};
use serde::{Deserialize, Deserializer, Serialize};

/// Provider tag carried in `_type`
pub const PROVIDER_TYPE: &str = "aws";

/// Network provisioning request/response.
///
/// Field order is the wire order; `network_aws_id` and `error_message` are
/// left out of the payload when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventEnvelope {
    #[serde(rename = "_uuid", deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(rename = "_batch_id", deserialize_with = "null_as_default")]
    pub batch_id: String,

    #[serde(rename = "_type", deserialize_with = "null_as_default")]
    pub provider_type: String,

    #[serde(deserialize_with = "null_as_default")]
    pub datacenter_region: String,

    #[serde(rename = "datacenter_secret", deserialize_with = "null_as_default")]
    pub datacenter_access_key: String,

    #[serde(rename = "datacenter_token", deserialize_with = "null_as_default")]
    pub datacenter_access_token: String,

    #[serde(deserialize_with = "null_as_default")]
    pub vpc_id: String,

    /// Subnet id assigned by the provider; the delete key
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub network_aws_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// CIDR block of the subnet
    #[serde(rename = "range", deserialize_with = "null_as_default")]
    pub subnet: String,

    #[serde(deserialize_with = "null_as_default")]
    pub is_public: bool,

    /// Requested zone on input (empty = provider default), resolved zone on output
    #[serde(deserialize_with = "null_as_default")]
    pub availability_zone: String,

    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub error_message: String,

    #[serde(skip)]
    subject: String,

    #[serde(skip)]
    action: Option<Action>,
}

impl EventEnvelope {
    /// Decode a payload received on `subject`
    pub fn decode(subject: &str, payload: &[u8]) -> Result<Self> {
        let mut envelope = serde_json::from_slice::<Option<EventEnvelope>>(payload)
            .map_err(EventError::Decode)?
            .unwrap_or_default();
        envelope.subject = subject.to_string();
        envelope.action = Action::from_subject(subject);
        Ok(envelope)
    }

    /// Subject the event arrived on
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Action parsed from the subject, `None` if unrecognized
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    /// Check required fields, stopping at the first failure
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.vpc_id.is_empty() {
            return Err(ValidationError::VpcIdInvalid);
        }

        if self.datacenter_region.is_empty() {
            return Err(ValidationError::RegionInvalid);
        }

        if self.datacenter_access_key.is_empty() || self.datacenter_access_token.is_empty() {
            return Err(ValidationError::CredentialsInvalid);
        }

        if self.action == Some(Action::Delete) {
            if self.network_aws_id.is_empty() {
                return Err(ValidationError::NetworkAwsIdInvalid);
            }
        } else if self.subnet.is_empty() {
            return Err(ValidationError::SubnetInvalid);
        }

        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            &self.datacenter_region,
            &self.datacenter_access_key,
            &self.datacenter_access_token,
        )
    }

    pub fn subnet_spec(&self) -> SubnetSpec {
        SubnetSpec::new(&self.vpc_id, &self.subnet, &self.availability_zone)
    }

    /// Serialize to the wire format
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(EventError::Encode)
    }

    /// Publish the envelope to `<subject>.done`.
    ///
    /// An encoding failure is reported on the error topic instead.
    pub async fn complete(&mut self, publisher: &dyn MessagePublisher) -> Result<()> {
        let data = match self.to_json() {
            Ok(data) => data,
            Err(err) => return self.fail(&err, publisher).await,
        };

        publisher.publish(&done_topic(&self.subject), data).await?;
        tracing::info!(
            subject = %self.subject,
            request = %self.uuid,
            subnet = %self.network_aws_id,
            "Network event completed"
        );
        Ok(())
    }

    /// Record `err` as the outcome and publish to `<subject>.error`
    pub async fn fail(&mut self, err: &EventError, publisher: &dyn MessagePublisher) -> Result<()> {
        let message = err.to_string();
        tracing::error!(subject = %self.subject, request = %self.uuid, "Error: {}", message);

        self.error_message = message;
        let data = self.to_json()?;
        publisher.publish(&error_topic(&self.subject), data).await
    }
}

/// `null` reads as the field's zero value, same as an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryBus;

    const CREATE: &str = "network.create.aws";
    const DELETE: &str = "network.delete.aws";

    /// A complete event in wire order
    const VALID: &str = concat!(
        r#"{"_uuid":"test","_batch_id":"test","_type":"aws","#,
        r#""datacenter_region":"eu-west-1","datacenter_secret":"key","datacenter_token":"token","#,
        r#""vpc_id":"vpc-0000000","network_aws_id":"subnet-00000000","#,
        r#""name":"web","range":"10.0.0.0/16","is_public":false,"availability_zone":""}"#
    );

    fn event(subject: &str, edit: impl FnOnce(&mut serde_json::Value)) -> EventEnvelope {
        let mut value: serde_json::Value = serde_json::from_str(VALID).unwrap();
        edit(&mut value);
        EventEnvelope::decode(subject, value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_decode_loads_fields() {
        let e = EventEnvelope::decode(CREATE, VALID.as_bytes()).unwrap();

        assert_eq!(e.uuid, "test");
        assert_eq!(e.batch_id, "test");
        assert_eq!(e.provider_type, PROVIDER_TYPE);
        assert_eq!(e.datacenter_region, "eu-west-1");
        assert_eq!(e.datacenter_access_key, "key");
        assert_eq!(e.datacenter_access_token, "token");
        assert_eq!(e.vpc_id, "vpc-0000000");
        assert_eq!(e.network_aws_id, "subnet-00000000");
        assert_eq!(e.subnet, "10.0.0.0/16");
        assert_eq!(e.subject(), CREATE);
        assert_eq!(e.action(), Some(Action::Create));
    }

    #[test]
    fn test_round_trip_preserves_bytes() {
        let e = EventEnvelope::decode(CREATE, VALID.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(e.to_json().unwrap()).unwrap(), VALID);
    }

    #[test]
    fn test_empty_optional_fields_are_omitted() {
        let e = EventEnvelope::decode(CREATE, br#"{"vpc_id":"vpc-1"}"#).unwrap();
        let json = String::from_utf8(e.to_json().unwrap()).unwrap();

        assert!(!json.contains("network_aws_id"));
        assert!(!json.contains("error_message"));
        assert!(json.contains(r#""availability_zone":"""#));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let e = EventEnvelope::decode(CREATE, br#"{"vpc_id":"vpc-1","service":"x"}"#).unwrap();
        assert_eq!(e.vpc_id, "vpc-1");
    }

    #[test]
    fn test_decode_treats_null_as_empty() {
        let e = EventEnvelope::decode(
            CREATE,
            br#"{"vpc_id":null,"range":"10.0.0.0/16","is_public":null}"#,
        )
        .unwrap();
        assert_eq!(e.vpc_id, "");
        assert_eq!(e.subnet, "10.0.0.0/16");
        assert!(!e.is_public);
        assert_eq!(e.validate(), Err(ValidationError::VpcIdInvalid));

        let e = EventEnvelope::decode(CREATE, b"null").unwrap();
        assert_eq!(e.vpc_id, "");
        assert_eq!(e.subject(), CREATE);
        assert_eq!(e.action(), Some(Action::Create));
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        assert!(matches!(
            EventEnvelope::decode(CREATE, b"{\"vpc_id\":"),
            Err(EventError::Decode(_))
        ));
        assert!(matches!(
            EventEnvelope::decode(CREATE, br#"{"is_public":"yes"}"#),
            Err(EventError::Decode(_))
        ));
    }

    #[test]
    fn test_valid_events() {
        assert_eq!(event(CREATE, |_| {}).validate(), Ok(()));
        assert_eq!(event(DELETE, |_| {}).validate(), Ok(()));
    }

    #[test]
    fn test_validation_messages() {
        let cases: [(&str, &str, &str); 6] = [
            (CREATE, "vpc_id", "Datacenter VPC ID invalid"),
            (CREATE, "datacenter_region", "Datacenter Region invalid"),
            (CREATE, "datacenter_secret", "Datacenter credentials invalid"),
            (CREATE, "datacenter_token", "Datacenter credentials invalid"),
            (CREATE, "range", "Network subnet invalid"),
            (DELETE, "network_aws_id", "Network aws id invalid"),
        ];

        for (subject, field, message) in cases {
            let e = event(subject, |v| v[field] = serde_json::json!(""));
            let err = e.validate().unwrap_err();
            assert_eq!(err.to_string(), message, "{} on {}", field, subject);
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let e = event(CREATE, |v| {
            v["vpc_id"] = serde_json::json!("");
            v["datacenter_region"] = serde_json::json!("");
            v["range"] = serde_json::json!("");
        });
        assert_eq!(e.validate(), Err(ValidationError::VpcIdInvalid));
    }

    #[test]
    fn test_delete_does_not_need_range() {
        let e = event(DELETE, |v| v["range"] = serde_json::json!(""));
        assert_eq!(e.validate(), Ok(()));

        let e = event(CREATE, |v| v["network_aws_id"] = serde_json::json!(""));
        assert_eq!(e.validate(), Ok(()));
    }

    #[test]
    fn test_credentials_and_spec() {
        let e = event(CREATE, |v| v["availability_zone"] = serde_json::json!("eu-west-1c"));

        assert_eq!(e.credentials(), Credentials::new("eu-west-1", "key", "token"));
        let spec = e.subnet_spec();
        assert_eq!(spec.vpc_id, "vpc-0000000");
        assert_eq!(spec.cidr_block, "10.0.0.0/16");
        assert_eq!(spec.availability_zone.as_deref(), Some("eu-west-1c"));
    }

    #[tokio::test]
    async fn test_complete_publishes_done() {
        let bus = MemoryBus::new();
        let mut e = EventEnvelope::decode(CREATE, VALID.as_bytes()).unwrap();

        e.complete(&bus).await.unwrap();

        assert_eq!(bus.on("network.create.aws.done"), vec![VALID.as_bytes().to_vec()]);
        assert!(bus.on("network.create.aws.error").is_empty());
    }

    #[tokio::test]
    async fn test_fail_publishes_error_message() {
        let bus = MemoryBus::new();
        let mut e = EventEnvelope::decode(CREATE, VALID.as_bytes()).unwrap();

        let err = EventError::Unsupported("network.create.aws".to_string());
        e.fail(&err, &bus).await.unwrap();

        let published = bus.on("network.create.aws.error");
        assert_eq!(published.len(), 1);
        let json = String::from_utf8(published[0].clone()).unwrap();
        assert!(json.contains(r#""error_message":"network.create.aws not supported""#));
        assert!(bus.on("network.create.aws.done").is_empty());
    }
}
