use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::types::MessageBody;
use models::service::{SortColumn, SortDirection};
use serde::Deserialize;
use service::errors::ServiceError;
use service::pagination::Pagination;
use service::registry::domain::{SearchQuery, Service, ServiceChanges, ServiceInput};
use service::registry::response::ServiceEnvelope;
use tracing::info;

use crate::errors::JsonApiError;
use crate::observability::track;
use crate::state::ServerState;

/// Listing parameters; every field falls back to its default when absent.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// `LIKE` pattern on the service name, default `%`
    pub query: Option<String>,
    /// created_at | updated_at | version | name
    pub sort: Option<String>,
    /// asc | desc
    pub dir: Option<String>,
    pub page: Option<String>,
    pub pagesize: Option<String>,
}

impl SearchParams {
    /// Unparsable page numbers fall back to the lowest valid value.
    pub fn into_query(self) -> Result<SearchQuery, ServiceError> {
        let sort = match self.sort.as_deref() {
            Some(s) => s.parse::<SortColumn>()?,
            None => SortColumn::default(),
        };
        let dir = match self.dir.as_deref() {
            Some(d) => d.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        let page = self.page.map(|p| p.trim().parse::<i64>().unwrap_or(0)).unwrap_or(1);
        let per_page = self.pagesize.map(|p| p.trim().parse::<i64>().unwrap_or(0)).unwrap_or(10);
        Ok(SearchQuery {
            query: self.query.unwrap_or_else(|| "%".to_string()),
            sort,
            dir,
            pagination: Pagination::new(page, per_page).normalize(),
        })
    }
}

#[utoipa::path(
    get, path = "/api/v1/services", tag = "services",
    params(SearchParams),
    responses(
        (status = 200, description = "All active services, or one page of the search when any query parameter is given", body = crate::openapi::ServicePaginationDoc),
        (status = 400, description = "Unknown sort column or direction", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    RawQuery(raw): RawQuery,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, JsonApiError> {
    if raw.as_deref().map_or(true, str::is_empty) {
        info!("received a request to get all services");
        let rows = track("fetch_all", state.registry.fetch_all().await)?;
        return Ok(Json(rows).into_response());
    }
    let Query(params) = params?;
    let query = params.into_query()?;
    info!(query = %query.query, sort = %query.sort, dir = %query.dir, page = query.pagination.page, page_size = query.pagination.per_page, "received a request to search services");
    let page = track("search_and_sort", state.registry.search_and_sort(&query).await)?;
    Ok(Json(page).into_response())
}

#[utoipa::path(
    post, path = "/api/v1/services", tag = "services",
    request_body = crate::openapi::ServiceInputDoc,
    responses(
        (status = 201, description = "Created at version 1", body = crate::openapi::ServiceEnvelopeDoc),
        (status = 400, description = "Invalid body or name already registered", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<ServiceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceEnvelope>), JsonApiError> {
    let Json(input) = body?;
    info!(name = %input.name, "received a request to create a service");
    let created = track("create", state.registry.create(input).await)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/v1/services/{name}", tag = "services",
    params(("name" = String, Path, description = "service name")),
    responses(
        (status = 200, description = "Every version of the service", body = [crate::openapi::ServiceDoc]),
        (status = 404, description = "Unknown name", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn fetch_by_name(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Service>>, JsonApiError> {
    info!(%name, "received a request to list all versions of the service");
    let rows = track("fetch_by_name", state.registry.fetch_by_name(&name).await)?;
    Ok(Json(rows))
}

#[utoipa::path(
    patch, path = "/api/v1/services/{name}", tag = "services",
    params(("name" = String, Path, description = "service name")),
    request_body = crate::openapi::ServiceInputDoc,
    responses(
        (status = 201, description = "New version appended", body = crate::openapi::ServiceEnvelopeDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Unknown name", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create_version(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    body: Result<Json<ServiceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceEnvelope>), JsonApiError> {
    let Json(input) = body?;
    info!(%name, "received a request to create a version for the service");
    let created = track("create_version", state.registry.create_version(&name, input).await)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/v1/services/{name}/{version}", tag = "services",
    params(
        ("name" = String, Path, description = "service name"),
        ("version" = i32, Path, description = "version number")
    ),
    responses(
        (status = 200, description = "The requested version", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Version is not an integer", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "No such name and version", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn fetch_version(
    State(state): State<ServerState>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> Result<Json<Service>, JsonApiError> {
    let Path((name, version)) = path?;
    info!(%name, version, "received a request to describe the service version");
    let row = track("fetch_by_version_and_name", state.registry.fetch_by_version_and_name(&name, version).await)?;
    Ok(Json(row))
}

#[utoipa::path(
    patch, path = "/api/v1/services/{name}/{version}", tag = "services",
    params(
        ("name" = String, Path, description = "service name"),
        ("version" = i32, Path, description = "version number")
    ),
    request_body = crate::openapi::ServiceChangesDoc,
    responses(
        (status = 201, description = "Version updated in place", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Invalid body or version", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "No such name and version", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_version(
    State(state): State<ServerState>,
    path: Result<Path<(String, i32)>, PathRejection>,
    body: Result<Json<ServiceChanges>, JsonRejection>,
) -> Result<(StatusCode, Json<Service>), JsonApiError> {
    let Path((name, version)) = path?;
    let Json(changes) = body?;
    info!(%name, version, "received a request to update the existing version of the service");
    let updated = track("update_version", state.registry.update_version(&name, version, changes).await)?;
    Ok((StatusCode::CREATED, Json(updated)))
}

#[utoipa::path(
    delete, path = "/api/v1/services/{name}", tag = "services",
    params(("name" = String, Path, description = "service name")),
    responses(
        (status = 202, description = "All versions soft-deleted", body = crate::openapi::MessageBodyDoc),
        (status = 404, description = "Unknown name", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<MessageBody>), JsonApiError> {
    info!(%name, "received a request to delete the service");
    track("delete", state.registry.delete(&name).await)?;
    Ok((StatusCode::ACCEPTED, Json(MessageBody::new(format!("service {name} accepted for deletion.")))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_params_take_defaults() {
        let q = SearchParams::default().into_query().unwrap();
        assert_eq!(q, SearchQuery::default());
    }

    #[test]
    fn paging_is_normalized_leniently() {
        let params = SearchParams { page: Some("abc".into()), pagesize: Some("5000".into()), ..Default::default() };
        let q = params.into_query().unwrap();
        assert_eq!((q.pagination.page, q.pagination.per_page), (1, 100));

        let params = SearchParams { page: Some("-2".into()), pagesize: Some("0".into()), ..Default::default() };
        let q = params.into_query().unwrap();
        assert_eq!((q.pagination.page, q.pagination.per_page), (1, 1));
    }

    #[test]
    fn unknown_sort_or_direction_is_invalid_input() {
        let params = SearchParams { sort: Some("id".into()), ..Default::default() };
        assert!(matches!(params.into_query(), Err(ServiceError::Validation(_))));
        let params = SearchParams { dir: Some("up".into()), ..Default::default() };
        assert!(matches!(params.into_query(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn explicit_sort_is_kept() {
        let params = SearchParams {
            query: Some("svc-%".into()),
            sort: Some("version".into()),
            dir: Some("asc".into()),
            page: Some("3".into()),
            pagesize: Some("20".into()),
        };
        let q = params.into_query().unwrap();
        assert_eq!(q.query, "svc-%");
        assert_eq!((q.sort, q.dir), (SortColumn::Version, SortDirection::Asc));
        assert_eq!((q.pagination.page, q.pagination.per_page), (3, 20));
    }
}
