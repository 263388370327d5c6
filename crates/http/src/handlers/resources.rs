use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use leadsync_core::{ListEnvelope, MutationResponse, ResourceName};
use serde_json::Value;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{EditRequest, FetchQuery};

fn parse_resource(raw: &str) -> Result<ResourceName, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(format!("unknown resource: {raw}")))
}

/// Body rejections keep the error envelope: 422 for well-formed JSON of the
/// wrong shape, 400 for everything else.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection @ JsonRejection::JsonDataError(_)) => {
            Err(ApiError::UnprocessableEntity(rejection.body_text()))
        },
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

fn capitalized(namespace: ResourceName) -> String {
    let name = namespace.as_str().replace('-', " ");
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    query: Result<Query<FetchQuery>, QueryRejection>,
) -> Result<Json<ListEnvelope<Value>>, ApiError> {
    let namespace = parse_resource(&resource)?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = query.page_request()?;
    let page = state.store.list(namespace, request).await;
    Ok(Json(ListEnvelope {
        message: format!("{} fetched", capitalized(namespace)),
        status: StatusCode::OK.as_u16(),
        data: page,
    }))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MutationResponse<Value>>), ApiError> {
    let namespace = parse_resource(&resource)?;
    let payload = body(payload)?;
    let record = state.store.create(namespace, payload).await?;
    tracing::info!(resource = %namespace, "created");
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::ok(format!("{} created", capitalized(namespace)), Some(record))),
    ))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    req: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<MutationResponse<Value>>, ApiError> {
    let namespace = parse_resource(&resource)?;
    let req = body(req)?;
    let record = state.store.update(namespace, &req.id, Value::Object(req.fields)).await?;
    tracing::info!(resource = %namespace, id = %req.id, "updated");
    Ok(Json(MutationResponse::ok(format!("{} updated", capitalized(namespace)), Some(record))))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<MutationResponse<Value>>, ApiError> {
    let namespace = parse_resource(&resource)?;
    let record = state.store.delete(namespace, &id).await?;
    tracing::info!(resource = %namespace, %id, "deleted");
    Ok(Json(MutationResponse::ok(format!("{} deleted", capitalized(namespace)), Some(record))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_naturally() {
        assert_eq!(capitalized(ResourceName::ChatAgents), "Chat agents");
        assert_eq!(capitalized(ResourceName::Addons), "Addons");
    }
}
