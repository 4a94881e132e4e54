use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{MenuCategory, PriceOption};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuItemInput {
    pub name: String,
    pub description: Option<String>,
    pub prices: Vec<PriceOption>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_veg: bool,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub must_try: bool,
    #[serde(default)]
    pub is_new: bool,
    pub gst_percent: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuCategoryInput {
    /// Present when the category already exists; a save without it creates a
    /// fresh category.
    pub id: Option<Uuid>,
    pub title: String,
    pub items: Vec<MenuItemInput>,
}

/// Wholesale menu save: the payload is the entire menu, the persisted set is
/// diffed against it and the save applies as one transaction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveMenuRequest {
    pub categories: Vec<MenuCategoryInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub categories: Vec<MenuCategory>,
}
