//! Actions encoded in inbound subjects

use std::str::FromStr;

/// Operation requested by a `<domain>.<action>.<provider>` subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a subnet (and its public access plumbing)
    Create,
    /// Update an existing network (unsupported)
    Update,
    /// Delete a subnet
    Delete,
    /// Read an existing network (unsupported)
    Get,
}

impl Action {
    /// Read the action from the second dot-segment of a subject.
    ///
    /// Returns `None` when the segment is missing or not a known action.
    pub fn from_subject(subject: &str) -> Option<Self> {
        subject.split('.').nth(1)?.parse().ok()
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "get" => Ok(Action::Get),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
            Action::Get => write!(f, "get"),
        }
    }
}
