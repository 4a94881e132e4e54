use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::Value;

use crate::{
    audit::log_audit,
    entity::settings::{ActiveModel as SettingActive, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_setting(
    state: &AppState,
    user: &AuthUser,
    key: &str,
) -> AppResult<ApiResponse<Value>> {
    ensure_admin(user)?;
    let setting = Settings::find_by_id(key).one(&state.orm).await?;
    match setting {
        Some(s) => Ok(ApiResponse::success("Setting", s.value, Some(Meta::empty()))),
        None => Err(AppError::NotFound),
    }
}

pub async fn put_setting(
    state: &AppState,
    user: &AuthUser,
    key: &str,
    value: Value,
) -> AppResult<ApiResponse<Value>> {
    ensure_admin(user)?;

    let existing = Settings::find_by_id(key).one(&state.orm).await?;
    let saved = match existing {
        Some(model) => {
            let mut active: SettingActive = model.into();
            active.value = Set(value);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            SettingActive {
                key: Set(key.to_string()),
                value: Set(value),
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "setting_update",
        Some("settings"),
        Some(serde_json::json!({ "key": key })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Setting saved",
        saved.value,
        Some(Meta::empty()),
    ))
}

/// Best-effort read used by non-critical paths: an unreadable settings doc
/// logs a warning and reads as absent.
pub async fn read_setting(state: &AppState, key: &str) -> Option<Value> {
    match Settings::find_by_id(key).one(&state.orm).await {
        Ok(setting) => setting.map(|s| s.value),
        Err(err) => {
            tracing::warn!(key, error = %err, "settings read failed");
            None
        }
    }
}
