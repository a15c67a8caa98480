//! # Item Handlers
//!
//! Each handler runs one linear sequence: validated input (extractors) →
//! open a unit of work → record store call → commit if it wrote → project to
//! the wire type. Any error returns early, and dropping the unit of work
//! rolls it back.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::observability::ObservationScope;
use crate::session::{Database, UnitOfWork};
use crate::store::{Item, ItemId};

use super::dto::{DeleteConfirmation, ItemCreate, ItemRead};
use super::errors::{ApiError, ApiResult};
use super::extract::{ItemIdPath, ValidatedJson};

/// State shared across item handlers
pub struct ItemsState {
    pub db: Database,
}

impl ItemsState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Create item routes
pub fn item_routes(state: Arc<ItemsState>) -> Router {
    Router::new()
        .route("/items/", post(create_item_handler))
        .route(
            "/items/:id",
            get(read_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .with_state(state)
}

fn observe_error(scope: ObservationScope<'_>, err: &ApiError) {
    if err.is_client_error() {
        scope.reject(&err.to_string());
    } else {
        scope.fail(&err.log_reason());
    }
}

fn observe<T>(scope: ObservationScope<'_>, result: &ApiResult<T>) {
    match result {
        Ok(_) => scope.complete(),
        Err(err) => observe_error(scope, err),
    }
}

// ==================
// Handlers
// ==================

async fn create_item_handler(
    State(state): State<Arc<ItemsState>>,
    ValidatedJson(payload): ValidatedJson<ItemCreate>,
) -> ApiResult<Json<ItemRead>> {
    let mut scope = ObservationScope::new("ITEM_CREATE");

    let result = create_item(&state.db, &mut scope, &payload.name).await;
    match &result {
        Ok(item) => scope.complete_with_fields(&[("id", &item.id.to_string())]),
        Err(err) => observe_error(scope, err),
    }

    result.map(|item| Json(item.into()))
}

async fn read_item_handler(
    State(state): State<Arc<ItemsState>>,
    ItemIdPath(id): ItemIdPath,
) -> ApiResult<Json<ItemRead>> {
    let id_field = id.to_string();
    let mut scope = ObservationScope::with_fields("ITEM_READ", &[("id", &id_field)]);

    let result = read_item(&state.db, &mut scope, id).await;
    observe(scope, &result);

    result.map(|item| Json(item.into()))
}

async fn update_item_handler(
    State(state): State<Arc<ItemsState>>,
    ItemIdPath(id): ItemIdPath,
    ValidatedJson(payload): ValidatedJson<ItemCreate>,
) -> ApiResult<Json<ItemRead>> {
    let id_field = id.to_string();
    let mut scope = ObservationScope::with_fields("ITEM_UPDATE", &[("id", &id_field)]);

    let result = update_item(&state.db, &mut scope, id, &payload.name).await;
    observe(scope, &result);

    result.map(|item| Json(item.into()))
}

async fn delete_item_handler(
    State(state): State<Arc<ItemsState>>,
    ItemIdPath(id): ItemIdPath,
) -> ApiResult<Json<DeleteConfirmation>> {
    let id_field = id.to_string();
    let mut scope = ObservationScope::with_fields("ITEM_DELETE", &[("id", &id_field)]);

    let result = delete_item(&state.db, &mut scope, id).await;
    observe(scope, &result);

    result.map(|()| Json(DeleteConfirmation::item_deleted()))
}

// ==================
// Units of work
// ==================

async fn begin(db: &Database, scope: &mut ObservationScope<'_>) -> ApiResult<UnitOfWork> {
    let uow = db.begin().await?;
    scope.record("unit_of_work", uow.id().to_string());
    Ok(uow)
}

async fn create_item(
    db: &Database,
    scope: &mut ObservationScope<'_>,
    name: &str,
) -> ApiResult<Item> {
    let mut uow = begin(db, scope).await?;
    let item = uow.items().insert(name).await?;
    uow.commit().await?;
    Ok(item)
}

async fn read_item(
    db: &Database,
    scope: &mut ObservationScope<'_>,
    id: ItemId,
) -> ApiResult<Item> {
    let mut uow = begin(db, scope).await?;
    let item = uow.items().get_by_id(id).await?;
    Ok(item)
}

async fn update_item(
    db: &Database,
    scope: &mut ObservationScope<'_>,
    id: ItemId,
    name: &str,
) -> ApiResult<Item> {
    let mut uow = begin(db, scope).await?;
    let item = uow.items().update_name(id, name).await?;
    uow.commit().await?;
    Ok(item)
}

async fn delete_item(
    db: &Database,
    scope: &mut ObservationScope<'_>,
    id: ItemId,
) -> ApiResult<()> {
    let mut uow = begin(db, scope).await?;
    uow.items().delete_by_id(id).await?;
    uow.commit().await?;
    Ok(())
}
