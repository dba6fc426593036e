use crate::dtos::{DeleteManyResponse, PersonResponse};
use crate::models::{AgeUpdate, PersonInput, BULK_DELETE_NAME, FAVORITE_FOOD};
use crate::startup::AppState;
use crate::utils::{parse_object_id, JsonBody};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

fn person_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Person not found"))
}

pub async fn create_person(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<PersonInput>,
) -> Result<impl IntoResponse, AppError> {
    let person = input.into_new_person()?;
    let person = state.repository.insert_one(person).await?;

    tracing::info!(person_id = %person.id, "Person created");

    Ok((StatusCode::CREATED, Json(PersonResponse::from(person))))
}

pub async fn create_many_people(
    State(state): State<AppState>,
    JsonBody(inputs): JsonBody<Vec<PersonInput>>,
) -> Result<impl IntoResponse, AppError> {
    // Validate everything up front so an invalid element writes nothing
    let people = inputs
        .into_iter()
        .map(PersonInput::into_new_person)
        .collect::<Result<Vec<_>, _>>()?;

    let people = state.repository.insert_many(people).await?;

    tracing::info!(count = people.len(), "Persons created");

    let body: Vec<PersonResponse> = people.into_iter().map(PersonResponse::from).collect();
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn list_people(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonResponse>>, AppError> {
    let people = state.repository.find_all().await?;
    Ok(Json(people.into_iter().map(PersonResponse::from).collect()))
}

pub async fn find_one_by_food(
    State(state): State<AppState>,
    Path(food): Path<String>,
) -> Result<Json<PersonResponse>, AppError> {
    let person = state
        .repository
        .find_one_by_food(&food)
        .await?
        .ok_or_else(person_not_found)?;
    Ok(Json(PersonResponse::from(person)))
}

pub async fn find_person_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let person = state
        .repository
        .find_by_id(id)
        .await?
        .ok_or_else(person_not_found)?;
    Ok(Json(PersonResponse::from(person)))
}

pub async fn add_favorite_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let person = state
        .repository
        .push_favorite_food(id, FAVORITE_FOOD)
        .await
        .map_err(|e| match e {
            AppError::DatabaseError(err) => {
                tracing::warn!(person_id = %id, "Failed to save favorite food: {}", err);
                AppError::BadRequest(anyhow::anyhow!("Failed to save person: {}", err))
            }
            other => other,
        })?
        .ok_or_else(person_not_found)?;

    tracing::info!(person_id = %person.id, food = FAVORITE_FOOD, "Favorite food added");

    Ok(Json(PersonResponse::from(person)))
}

pub async fn update_age_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    JsonBody(update): JsonBody<AgeUpdate>,
) -> Result<Json<PersonResponse>, AppError> {
    let age = update.into_age()?;
    let person = state
        .repository
        .update_age_by_name(&name, age)
        .await?
        .ok_or_else(person_not_found)?;

    tracing::info!(person_id = %person.id, age, "Person age updated");

    Ok(Json(PersonResponse::from(person)))
}

pub async fn delete_person_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let person = state
        .repository
        .delete_by_id(id)
        .await?
        .ok_or_else(person_not_found)?;

    tracing::info!(person_id = %person.id, "Person deleted");

    Ok(Json(PersonResponse::from(person)))
}

pub async fn delete_all_named_mary(
    State(state): State<AppState>,
) -> Result<Json<DeleteManyResponse>, AppError> {
    let deleted = state
        .repository
        .delete_many_by_name(BULK_DELETE_NAME)
        .await?;

    tracing::info!(person_name = BULK_DELETE_NAME, deleted, "Persons deleted by name");

    Ok(Json(DeleteManyResponse::new(deleted)))
}
