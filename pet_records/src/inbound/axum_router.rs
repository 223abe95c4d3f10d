//! axum router for `/mascotas` and `/duenios`

use std::{str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use petstore_error_response::{ErrorResponse, FieldErrors, ValidationErrorResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{
    model::{Flag, Owner, OwnerFields, OwnerId, PetFields, PetId, PetWithOwner, RecordError},
    ports::{OwnerService, PetService},
};


/// State shared by the record handlers
pub struct PetRecordsRouterState<T> {
    service: Arc<T>,
}

impl<T> Clone for PetRecordsRouterState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T> PetRecordsRouterState<T>
where
    T: PetService + OwnerService,
{
    /// Creates a new router state owning the service
    pub fn new(service: T) -> Self {
        Self::from_arc(Arc::new(service))
    }

    /// Creates a new router state from an already shared service
    pub fn from_arc(service: Arc<T>) -> Self {
        PetRecordsRouterState { service }
    }
}

/// Builds the router for the pet and owner resources
pub fn pet_records_router<T, S>(state: PetRecordsRouterState<T>) -> Router<S>
where
    T: PetService + OwnerService,
    S: Send + Sync,
{
    Router::new()
        .route(
            "/mascotas",
            get(list_pets_handler::<T>).post(create_pet_handler::<T>),
        )
        .route(
            "/mascotas/:id",
            get(get_pet_handler::<T>)
                .put(update_pet_handler::<T>)
                .delete(delete_pet_handler::<T>),
        )
        .route(
            "/duenios",
            get(list_owners_handler::<T>).post(create_owner_handler::<T>),
        )
        .route(
            "/duenios/:id",
            get(get_owner_handler::<T>)
                .put(update_owner_handler::<T>)
                .delete(delete_owner_handler::<T>),
        )
        .with_state(state)
}

/// A pet together with the owner fields it is stored with
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PetRequest {
    /// Name of the pet
    pub name: String,
    /// Breed
    pub breed: String,
    /// Coat color
    pub color: String,
    /// One of `-`, `SI`, `NO`. Defaults to `-`.
    #[schema(example = "NO")]
    pub allergic: Option<String>,
    /// One of `-`, `SI`, `NO`. Defaults to `-`.
    #[schema(example = "-")]
    pub special_attention: Option<String>,
    /// Free text notes
    pub observations: String,
    /// Name of the owner
    pub owner_name: String,
    /// Phone of the owner
    pub owner_phone: String,
}

fn parse_flag(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Flag {
    match value.map(str::trim) {
        None | Some("") => Flag::Unknown,
        Some(value) => Flag::from_str(value).unwrap_or_else(|_| {
            errors.add(field, format!("{field} must be one of -, SI, NO"));
            Flag::Unknown
        }),
    }
}

impl PetRequest {
    fn into_fields(self) -> Result<(PetFields, OwnerFields), FieldErrors> {
        let mut errors = FieldErrors::new();
        let allergic = parse_flag(&mut errors, "allergic", self.allergic.as_deref());
        let special_attention = parse_flag(
            &mut errors,
            "specialAttention",
            self.special_attention.as_deref(),
        );

        let pet = PetFields {
            name: self.name,
            breed: self.breed,
            color: self.color,
            allergic,
            special_attention,
            observations: self.observations,
        };
        let owner = OwnerFields {
            name: self.owner_name,
            phone: self.owner_phone,
        };

        if !errors.is_empty() {
            // report the blank fields in the same response
            pet.collect_errors(&mut errors);
            owner.collect_errors(&mut errors, "ownerName", "ownerPhone");
            return Err(errors);
        }

        Ok((pet, owner))
    }
}

/// A stored pet with its owner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    /// The id of the pet
    pub id: i64,
    /// Name of the pet
    pub name: String,
    /// Breed
    pub breed: String,
    /// Coat color
    pub color: String,
    /// One of `-`, `SI`, `NO`
    pub allergic: String,
    /// One of `-`, `SI`, `NO`
    pub special_attention: String,
    /// Free text notes
    pub observations: String,
    /// The id of the owner
    pub owner_id: i64,
    /// Name of the owner
    pub owner_name: String,
    /// Phone of the owner
    pub owner_phone: String,
}

impl From<PetWithOwner> for PetResponse {
    fn from(PetWithOwner { pet, owner }: PetWithOwner) -> Self {
        PetResponse {
            id: pet.id.0,
            name: pet.name,
            breed: pet.breed,
            color: pet.color,
            allergic: pet.allergic.to_string(),
            special_attention: pet.special_attention.to_string(),
            observations: pet.observations,
            owner_id: owner.id.0,
            owner_name: owner.name,
            owner_phone: owner.phone,
        }
    }
}

/// Owner fields
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerRequest {
    /// Display name
    pub name: String,
    /// Contact phone number
    pub phone: String,
}

impl From<OwnerRequest> for OwnerFields {
    fn from(OwnerRequest { name, phone }: OwnerRequest) -> Self {
        OwnerFields { name, phone }
    }
}

/// A stored owner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    /// The id of the owner
    pub id: i64,
    /// Display name
    pub name: String,
    /// Contact phone number
    pub phone: String,
}

impl From<Owner> for OwnerResponse {
    fn from(Owner { id, name, phone }: Owner) -> Self {
        OwnerResponse {
            id: id.0,
            name,
            phone,
        }
    }
}

/// Errors produced by the record handlers
#[derive(Debug, Error)]
pub enum PetRecordsHttpErr {
    /// Error returned by the record service
    #[error(transparent)]
    Record(#[from] RecordError),
    /// The payload could not be turned into record fields
    #[error("Validation failed: {0}")]
    InvalidPayload(FieldErrors),
    /// The body is not the expected json
    #[error(transparent)]
    MalformedBody(#[from] JsonRejection),
    /// The id in the path is not a number
    #[error(transparent)]
    MalformedPath(#[from] PathRejection),
}

impl IntoResponse for PetRecordsHttpErr {
    fn into_response(self) -> Response {
        match self {
            PetRecordsHttpErr::Record(RecordError::ValidationFailed(errors))
            | PetRecordsHttpErr::InvalidPayload(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse::from(errors)),
            )
                .into_response(),
            PetRecordsHttpErr::Record(e @ RecordError::OwnerHasPets { .. }) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    message: &e.to_string(),
                }),
            )
                .into_response(),
            PetRecordsHttpErr::Record(e) if e.is_not_found() => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    message: &e.to_string(),
                }),
            )
                .into_response(),
            PetRecordsHttpErr::Record(e) => {
                tracing::error!(error=?e, "record operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        message: "An internal server error has occurred",
                    }),
                )
                    .into_response()
            }
            PetRecordsHttpErr::MalformedBody(rejection) => (
                rejection.status(),
                Json(ErrorResponse {
                    message: &rejection.body_text(),
                }),
            )
                .into_response(),
            PetRecordsHttpErr::MalformedPath(rejection) => (
                rejection.status(),
                Json(ErrorResponse {
                    message: &rejection.body_text(),
                }),
            )
                .into_response(),
        }
    }
}

/// Lists every pet with its owner
#[utoipa::path(
    get,
    path = "/api/mascotas",
    operation_id = "list_pets",
    tag = "mascotas",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [PetResponse]),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), err)]
pub async fn list_pets_handler<T: PetService>(
    State(state): State<PetRecordsRouterState<T>>,
) -> Result<Json<Vec<PetResponse>>, PetRecordsHttpErr> {
    let pets = state.service.list_pets().await?;
    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

/// Gets a single pet with its owner
#[utoipa::path(
    get,
    path = "/api/mascotas/{id}",
    operation_id = "get_pet",
    tag = "mascotas",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "The id of the pet")),
    responses(
        (status = 200, body = PetResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), err)]
pub async fn get_pet_handler<T: PetService>(
    State(state): State<PetRecordsRouterState<T>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PetResponse>, PetRecordsHttpErr> {
    let Path(id) = id?;
    let pet = state.service.get_pet(PetId(id)).await?;
    Ok(Json(pet.into()))
}

/// Stores a new pet together with a new owner
#[utoipa::path(
    post,
    path = "/api/mascotas",
    operation_id = "create_pet",
    tag = "mascotas",
    security(("bearer" = [])),
    request_body = PetRequest,
    responses(
        (status = 201, body = PetResponse),
        (status = 400, body = ValidationErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), err)]
pub async fn create_pet_handler<T: PetService>(
    State(state): State<PetRecordsRouterState<T>>,
    body: Result<Json<PetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PetResponse>), PetRecordsHttpErr> {
    let Json(req) = body?;
    let (pet, owner) = req
        .into_fields()
        .map_err(PetRecordsHttpErr::InvalidPayload)?;

    let created = state.service.create_pet(pet, owner).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Overwrites a pet and the owner it references
#[utoipa::path(
    put,
    path = "/api/mascotas/{id}",
    operation_id = "update_pet",
    tag = "mascotas",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "The id of the pet")),
    request_body = PetRequest,
    responses(
        (status = 200, body = PetResponse),
        (status = 400, body = ValidationErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), err)]
pub async fn update_pet_handler<T: PetService>(
    State(state): State<PetRecordsRouterState<T>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<PetRequest>, JsonRejection>,
) -> Result<Json<PetResponse>, PetRecordsHttpErr> {
    let Path(id) = id?;
    let Json(req) = body?;
    let (pet, owner) = req
        .into_fields()
        .map_err(PetRecordsHttpErr::InvalidPayload)?;

    let updated = state.service.update_pet(PetId(id), pet, owner).await?;
    Ok(Json(updated.into()))
}

/// Removes a pet, and its owner when no other pet references it
#[utoipa::path(
    delete,
    path = "/api/mascotas/{id}",
    operation_id = "delete_pet",
    tag = "mascotas",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "The id of the pet")),
    responses(
        (status = 204),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), err)]
pub async fn delete_pet_handler<T: PetService>(
    State(state): State<PetRecordsRouterState<T>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, PetRecordsHttpErr> {
    let Path(id) = id?;
    state.service.delete_pet(PetId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists every owner
#[utoipa::path(
    get,
    path = "/api/duenios",
    operation_id = "list_owners",
    tag = "duenios",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [OwnerResponse]),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), err)]
pub async fn list_owners_handler<T: OwnerService>(
    State(state): State<PetRecordsRouterState<T>>,
) -> Result<Json<Vec<OwnerResponse>>, PetRecordsHttpErr> {
    let owners = state.service.list_owners().await?;
    Ok(Json(owners.into_iter().map(OwnerResponse::from).collect()))
}

/// Gets a single owner
#[utoipa::path(
    get,
    path = "/api/duenios/{id}",
    operation_id = "get_owner",
    tag = "duenios",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "The id of the owner")),
    responses(
        (status = 200, body = OwnerResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), err)]
pub async fn get_owner_handler<T: OwnerService>(
    State(state): State<PetRecordsRouterState<T>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<OwnerResponse>, PetRecordsHttpErr> {
    let Path(id) = id?;
    let owner = state.service.get_owner(OwnerId(id)).await?;
    Ok(Json(owner.into()))
}

/// Stores an owner without pets
#[utoipa::path(
    post,
    path = "/api/duenios",
    operation_id = "create_owner",
    tag = "duenios",
    security(("bearer" = [])),
    request_body = OwnerRequest,
    responses(
        (status = 201, body = OwnerResponse),
        (status = 400, body = ValidationErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), err)]
pub async fn create_owner_handler<T: OwnerService>(
    State(state): State<PetRecordsRouterState<T>>,
    body: Result<Json<OwnerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OwnerResponse>), PetRecordsHttpErr> {
    let Json(req) = body?;
    let owner = state.service.create_owner(req.into()).await?;
    Ok((StatusCode::CREATED, Json(owner.into())))
}

/// Overwrites name and phone of an owner
#[utoipa::path(
    put,
    path = "/api/duenios/{id}",
    operation_id = "update_owner",
    tag = "duenios",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "The id of the owner")),
    request_body = OwnerRequest,
    responses(
        (status = 200, body = OwnerResponse),
        (status = 400, body = ValidationErrorResponse),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, body), err)]
pub async fn update_owner_handler<T: OwnerService>(
    State(state): State<PetRecordsRouterState<T>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<OwnerRequest>, JsonRejection>,
) -> Result<Json<OwnerResponse>, PetRecordsHttpErr> {
    let Path(id) = id?;
    let Json(req) = body?;
    let owner = state.service.update_owner(OwnerId(id), req.into()).await?;
    Ok(Json(owner.into()))
}

/// Removes an owner that no pet references
#[utoipa::path(
    delete,
    path = "/api/duenios/{id}",
    operation_id = "delete_owner",
    tag = "duenios",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "The id of the owner")),
    responses(
        (status = 204),
        (status = 401, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state), err)]
pub async fn delete_owner_handler<T: OwnerService>(
    State(state): State<PetRecordsRouterState<T>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, PetRecordsHttpErr> {
    let Path(id) = id?;
    state.service.delete_owner(OwnerId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
