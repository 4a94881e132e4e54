use std::collections::HashSet;

use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{MenuResponse, SaveMenuRequest},
    entity::{
        menu_categories::{
            ActiveModel as CategoryActive, Column as CategoryCol, Entity as MenuCategories,
            Model as CategoryModel,
        },
        menu_items::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as MenuItems, Model as ItemModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{MenuCategory, MenuItem, PriceOption},
    pricing::DEFAULT_GST_PERCENT,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_menu(state: &AppState) -> AppResult<ApiResponse<MenuResponse>> {
    let categories = MenuCategories::find()
        .order_by_asc(CategoryCol::Position)
        .all(&state.orm)
        .await?;

    let mut out = Vec::with_capacity(categories.len());
    for category in categories {
        let items = MenuItems::find()
            .filter(ItemCol::CategoryId.eq(category.id))
            .order_by_asc(ItemCol::Position)
            .all(&state.orm)
            .await?;
        out.push(category_from_entity(category, items));
    }

    Ok(ApiResponse::success(
        "Menu",
        MenuResponse { categories: out },
        Some(Meta::empty()),
    ))
}

/// Wholesale save: the payload is the whole menu. Persisted categories
/// missing from the payload are deleted, the rest are upserted with their
/// items replaced, all inside one transaction so a save is all-or-nothing.
pub async fn save_menu(
    state: &AppState,
    user: &AuthUser,
    payload: SaveMenuRequest,
) -> AppResult<ApiResponse<MenuResponse>> {
    ensure_admin(user)?;

    for category in &payload.categories {
        if category.title.trim().is_empty() {
            return Err(AppError::BadRequest("Category title is required".into()));
        }
        for item in &category.items {
            if item.name.trim().is_empty() {
                return Err(AppError::BadRequest("Menu item name is required".into()));
            }
        }
    }

    let txn = state.orm.begin().await?;

    let existing = MenuCategories::find().all(&txn).await?;
    let kept: HashSet<Uuid> = payload
        .categories
        .iter()
        .filter_map(|c| c.id)
        .collect();

    for category in &existing {
        if !kept.contains(&category.id) {
            // Items cascade with the category.
            MenuCategories::delete_by_id(category.id).exec(&txn).await?;
        }
    }

    for (position, category) in payload.categories.into_iter().enumerate() {
        let category_id = match category.id {
            Some(id) if existing.iter().any(|c| c.id == id) => {
                let mut active: CategoryActive = existing
                    .iter()
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or(AppError::NotFound)?
                    .into();
                active.title = Set(category.title.clone());
                active.position = Set(position as i32);
                active.update(&txn).await?;
                // Replace the category's items wholesale.
                MenuItems::delete_many()
                    .filter(ItemCol::CategoryId.eq(id))
                    .exec(&txn)
                    .await?;
                id
            }
            _ => {
                let id = Uuid::new_v4();
                CategoryActive {
                    id: Set(id),
                    title: Set(category.title.clone()),
                    position: Set(position as i32),
                    created_at: NotSet,
                }
                .insert(&txn)
                .await?;
                id
            }
        };

        for (item_position, item) in category.items.into_iter().enumerate() {
            let prices = serde_json::to_value(&item.prices)
                .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
            ItemActive {
                id: Set(Uuid::new_v4()),
                category_id: Set(category_id),
                name: Set(item.name),
                description: Set(item.description),
                prices: Set(prices),
                image_url: Set(item.image_url),
                is_veg: Set(item.is_veg),
                popular: Set(item.popular),
                must_try: Set(item.must_try),
                is_new: Set(item.is_new),
                gst_percent: Set(item
                    .gst_percent
                    .unwrap_or_else(|| Decimal::from(DEFAULT_GST_PERCENT))),
                position: Set(item_position as i32),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_saved",
        Some("menu"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    get_menu(state).await
}

fn category_from_entity(category: CategoryModel, items: Vec<ItemModel>) -> MenuCategory {
    MenuCategory {
        id: category.id,
        title: category.title,
        position: category.position,
        items: items.into_iter().map(item_from_entity).collect(),
    }
}

fn item_from_entity(model: ItemModel) -> MenuItem {
    // A malformed prices document falls back to an empty list rather than
    // failing the whole menu read.
    let prices: Vec<PriceOption> = serde_json::from_value(model.prices.clone()).unwrap_or_else(|e| {
        tracing::warn!(item = %model.name, error = %e, "unreadable prices document");
        Vec::new()
    });
    MenuItem {
        id: model.id,
        name: model.name,
        description: model.description,
        prices,
        image_url: model.image_url,
        is_veg: model.is_veg,
        popular: model.popular,
        must_try: model.must_try,
        is_new: model.is_new,
        gst_percent: model.gst_percent,
    }
}
