use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::Record;

/// Delivery status of a scheduled message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Draft,
    Scheduled,
    Delivered,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Draft => "draft",
            MessageStatus::Scheduled => "scheduled",
            MessageStatus::Delivered => "delivered",
        }
    }

    pub fn parse_status(s: &str) -> Option<MessageStatus> {
        match s {
            "draft" => Some(MessageStatus::Draft),
            "scheduled" => Some(MessageStatus::Scheduled),
            "delivered" => Some(MessageStatus::Delivered),
            _ => None,
        }
    }

    /// No transition leaves this state
    pub fn is_terminal(self) -> bool {
        self == MessageStatus::Delivered
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A letter written now and delivered to someone later.
///
/// `status == Scheduled` implies `delivery_on.is_some()`. The lifecycle
/// operations in `ops::delivery` are the only writers of `status`, and rows
/// read back from a store are rejected when they break this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    #[serde(default)]
    pub id: String,
    pub recipient: String,
    pub subject: String,
    pub content: String,
    pub authored_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_on: Option<NaiveDate>,
    pub status: MessageStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ScheduledMessage {
    pub fn check_delivery(&self) -> Result<(), String> {
        if self.status == MessageStatus::Scheduled && self.delivery_on.is_none() {
            return Err(format!("{} is scheduled but has no delivery date", self.id));
        }
        Ok(())
    }
}

impl Record for ScheduledMessage {
    fn date(&self) -> NaiveDate {
        self.authored_on
    }
    fn text_fields(&self) -> Vec<&str> {
        vec![
            self.recipient.as_str(),
            self.subject.as_str(),
            self.content.as_str(),
        ]
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn category(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}
