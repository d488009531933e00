//! Handlers for `/api/listitems`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::model::{ItemId, ItemPayload, ListItem};
use crate::store::{ListItemStore, StoreError};

pub const BASE_PATH: &str = "/api/listitems";

pub type SharedStore = Arc<ListItemStore>;

type IdPath = Result<Path<ItemId>, PathRejection>;

fn item_id(path: IdPath) -> Result<ItemId, ApiError> {
    let Path(id) = path.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(id)
}

pub async fn list_items(State(store): State<SharedStore>) -> Json<Vec<ListItem>> {
    Json(store.list().await)
}

pub async fn get_item(
    State(store): State<SharedStore>,
    path: IdPath,
) -> Result<Json<ListItem>, ApiError> {
    let id = item_id(path)?;
    Ok(Json(store.get(id).await?))
}

pub async fn create_item(
    State(store): State<SharedStore>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let title = input.trimmed_title().ok_or_else(ApiError::title_required)?;

    let item = store.insert(title.to_string(), input.is_completed).await?;
    info!(id = item.id, title = %item.title, "created item");

    let location = HeaderValue::from_str(&format!("{BASE_PATH}/{}", item.id))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    )
        .into_response())
}

pub async fn update_item(
    State(store): State<SharedStore>,
    path: IdPath,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Json<ListItem>, ApiError> {
    let id = item_id(path)?;
    let Json(input) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let title = input.trimmed_title().ok_or_else(ApiError::title_required)?;

    match store.update(id, title.to_string(), input.is_completed).await {
        Ok(item) => {
            info!(
                id,
                title = %item.title,
                is_completed = item.is_completed,
                "updated item"
            );
            Ok(Json(item))
        }
        Err(StoreError::NotFound(_)) => {
            warn!(id, "update of missing item");
            Err(ApiError::NotFound(id))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_item(
    State(store): State<SharedStore>,
    path: IdPath,
) -> Result<StatusCode, ApiError> {
    let id = item_id(path)?;
    match store.remove(id).await {
        Ok(item) => {
            info!(id, title = %item.title, "deleted item");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::NotFound(_)) => {
            warn!(id, "delete of missing item");
            Err(ApiError::NotFound(id))
        }
        Err(err) => Err(err.into()),
    }
}
