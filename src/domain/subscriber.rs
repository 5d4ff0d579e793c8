//! Newsletter subscriber types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Delivery status of a subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriberStatus::Active => write!(f, "active"),
            SubscriberStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for SubscriberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriberStatus::Active),
            "inactive" => Ok(SubscriberStatus::Inactive),
            _ => Err(format!("Invalid subscriber status: {}", s)),
        }
    }
}

/// A newsletter subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: SubscriberStatus,
    pub subscribed_at: DateTime<Utc>,
}

/// Request body for subscribing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSubscriber {
    /// Assigned automatically when absent.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub email: String,
}

impl NewSubscriber {
    /// Minimal shape check on the address.
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(format!("Invalid email address: {}", self.email)),
        }
    }
}

/// Partial subscriber update.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct SubscriberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<SubscriberStatus>,
}

impl SubscriberUpdate {
    pub fn apply(self, subscriber: &mut Subscriber) {
        if let Some(v) = self.name {
            subscriber.name = v;
        }
        if let Some(v) = self.email {
            subscriber.email = v.trim().to_lowercase();
        }
        if let Some(v) = self.status {
            subscriber.status = v;
        }
    }
}
