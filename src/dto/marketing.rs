use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::analytics::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSegment {
    New,
    Repeat,
    All,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailCampaignRequest {
    pub subject: String,
    pub body: String,
    /// Segment to target; recipients resolve from order history emails.
    pub segment: Option<CustomerSegment>,
    pub range: Option<DateRange>,
    #[serde(default)]
    pub manual_emails: Vec<String>,
}

/// The assembled payload handed to the external email flow. Dispatch itself
/// is out of scope.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailPayload {
    pub subject: String,
    pub body: String,
    pub to: Vec<String>,
    pub provider_configured: bool,
}
