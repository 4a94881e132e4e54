use crate::{
    analytics,
    dto::customers::{CustomerDto, CustomerList},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    services::analytics_service::load_order_facts,
    state::AppState,
};

/// Customers are an aggregation view over orders, recomputed on every read.
pub async fn list_customers(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CustomerList>> {
    ensure_admin(user)?;

    let facts = load_order_facts(state).await?;
    let customers = analytics::fold_customers(&facts);

    let items = customers
        .into_iter()
        .map(|c| {
            let chat_link = chat_link(&c.phone);
            let maps_link = maps_link(&c.address);
            CustomerDto {
                name: c.name,
                phone: c.phone,
                address: c.address,
                total_orders: c.total_orders,
                total_spent: c.total_spent,
                last_purchase: c.last_purchase,
                chat_link,
                maps_link,
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(Meta::empty()),
    ))
}

fn chat_link(phone: &str) -> String {
    format!("https://wa.me/{phone}")
}

fn maps_link(address: &str) -> Option<String> {
    if address.is_empty() || address == "Take-away" {
        return None;
    }
    let encoded: String = address
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    Some(format!(
        "https://www.google.com/maps/search/?api=1&query={encoded}"
    ))
}
