use std::collections::HashSet;

use chrono::Utc;

use crate::{
    analytics::DateRange,
    dto::marketing::{CustomerSegment, EmailCampaignRequest, EmailPayload},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    services::{analytics_service::load_order_facts, settings_service},
    state::AppState,
};

/// Assemble the payload for the external email flow: resolve segment
/// recipients from order history, merge manual addresses, and report whether
/// a provider key is on file. The send itself happens elsewhere.
pub async fn assemble_email(
    state: &AppState,
    user: &AuthUser,
    payload: EmailCampaignRequest,
) -> AppResult<ApiResponse<EmailPayload>> {
    ensure_admin(user)?;

    if payload.subject.trim().is_empty() {
        return Err(AppError::BadRequest("Subject is required".into()));
    }

    let segment = payload.segment.unwrap_or(CustomerSegment::All);
    let range = payload.range.unwrap_or(DateRange::AllTime);

    let facts = load_order_facts(state).await?;
    let (start, end) = range.bounds(Utc::now());

    let historical_phones: HashSet<&str> = facts
        .iter()
        .filter(|o| matches!(start, Some(start) if o.created_at < start))
        .map(|o| o.phone.as_str())
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut to: Vec<String> = Vec::new();
    for order in &facts {
        if let Some(start) = start {
            if order.created_at < start {
                continue;
            }
        }
        if let Some(end) = end {
            if order.created_at >= end {
                continue;
            }
        }
        let is_repeat = historical_phones.contains(order.phone.as_str());
        let wanted = match segment {
            CustomerSegment::All => true,
            CustomerSegment::New => !is_repeat,
            CustomerSegment::Repeat => is_repeat,
        };
        if !wanted {
            continue;
        }
        if let Some(email) = order.customer_email.as_deref() {
            if !email.is_empty() && seen.insert(email.to_lowercase()) {
                to.push(email.to_string());
            }
        }
    }

    for email in payload.manual_emails {
        let email = email.trim().to_string();
        if email.contains('@') && seen.insert(email.to_lowercase()) {
            to.push(email);
        }
    }

    let provider_configured = settings_service::read_setting(state, "sendgrid")
        .await
        .is_some();

    Ok(ApiResponse::success(
        "Email payload assembled",
        EmailPayload {
            subject: payload.subject,
            body: payload.body,
            to,
            provider_configured,
        },
        Some(Meta::empty()),
    ))
}
