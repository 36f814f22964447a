use axum::{
    Json,
    extract::State,
    response::Redirect,
};
use tracing::info;
use uuid::Uuid;

use classifieds_db::Database;
use classifieds_types::catalog::{BreedForm, BreedResponse, CatForm, CatListResponse};

use crate::error::{ApiError, FieldErrors};
use crate::extractors::{AppJson, AppPath};
use crate::forms::{self, CleanCat};
use crate::rows::{breed_response, cat_response};
use crate::state::AppState;

// -- Cats --

/// GET /cats
pub async fn list_cats(State(state): State<AppState>) -> Result<Json<CatListResponse>, ApiError> {
    let (cats, breed_count) = state
        .with_db(|db| Ok((db.list_cats()?, db.count_breeds()?)))
        .await?;

    Ok(Json(CatListResponse {
        cats: cats.into_iter().map(cat_response).collect(),
        breed_count,
    }))
}

/// POST /cats
pub async fn create_cat(
    State(state): State<AppState>,
    AppJson(form): AppJson<CatForm>,
) -> Result<Redirect, ApiError> {
    let cat = forms::clean_cat(form)?;
    let cat_id = Uuid::new_v4();

    state
        .with_db(move |db| {
            ensure_breed(db, &cat)?;
            db.insert_cat(&cat_id.to_string(), &cat.nickname, &cat.foods, &cat.weight, &cat.breed_id)?;
            Ok(())
        })
        .await?;

    info!("Cat {} created", cat_id);
    Ok(Redirect::to("/cats"))
}

/// POST /cats/{cat_id}/update
pub async fn update_cat(
    State(state): State<AppState>,
    AppPath(cat_id): AppPath<Uuid>,
    AppJson(form): AppJson<CatForm>,
) -> Result<Redirect, ApiError> {
    state
        .with_db(move |db| {
            let id = cat_id.to_string();
            if db.get_cat(&id)?.is_none() {
                return Err(ApiError::NotFound);
            }
            let cat = forms::clean_cat(form)?;
            ensure_breed(db, &cat)?;
            if !db.update_cat(&id, &cat.nickname, &cat.foods, &cat.weight, &cat.breed_id)? {
                return Err(ApiError::NotFound);
            }
            Ok(())
        })
        .await?;

    info!("Cat {} updated", cat_id);
    Ok(Redirect::to("/cats"))
}

/// POST /cats/{cat_id}/delete
pub async fn delete_cat(
    State(state): State<AppState>,
    AppPath(cat_id): AppPath<Uuid>,
) -> Result<Redirect, ApiError> {
    let deleted = state
        .with_db(move |db| Ok(db.delete_cat(&cat_id.to_string())?))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Cat {} deleted", cat_id);
    Ok(Redirect::to("/cats"))
}

fn ensure_breed(db: &Database, cat: &CleanCat) -> Result<(), ApiError> {
    if db.get_breed(&cat.breed_id)?.is_none() {
        return Err(FieldErrors::single(
            "breed",
            "Select a valid choice. That choice is not one of the available choices.",
        )
        .into());
    }
    Ok(())
}

// -- Breeds --

/// GET /cats/breeds
pub async fn list_breeds(State(state): State<AppState>) -> Result<Json<Vec<BreedResponse>>, ApiError> {
    let breeds = state.with_db(|db| Ok(db.list_breeds()?)).await?;
    Ok(Json(breeds.into_iter().map(breed_response).collect()))
}

/// POST /cats/breeds
pub async fn create_breed(
    State(state): State<AppState>,
    AppJson(form): AppJson<BreedForm>,
) -> Result<Redirect, ApiError> {
    let name = forms::clean_breed(form)?;
    let breed_id = Uuid::new_v4();

    state
        .with_db(move |db| Ok(db.insert_breed(&breed_id.to_string(), &name)?))
        .await?;

    info!("Breed {} created", breed_id);
    Ok(Redirect::to("/cats/breeds"))
}

/// POST /cats/breeds/{breed_id}/update
pub async fn update_breed(
    State(state): State<AppState>,
    AppPath(breed_id): AppPath<Uuid>,
    AppJson(form): AppJson<BreedForm>,
) -> Result<Redirect, ApiError> {
    state
        .with_db(move |db| {
            let id = breed_id.to_string();
            if db.get_breed(&id)?.is_none() {
                return Err(ApiError::NotFound);
            }
            let name = forms::clean_breed(form)?;
            if !db.update_breed(&id, &name)? {
                return Err(ApiError::NotFound);
            }
            Ok(())
        })
        .await?;

    info!("Breed {} updated", breed_id);
    Ok(Redirect::to("/cats/breeds"))
}

/// POST /cats/breeds/{breed_id}/delete: takes the breed's cats with it.
pub async fn delete_breed(
    State(state): State<AppState>,
    AppPath(breed_id): AppPath<Uuid>,
) -> Result<Redirect, ApiError> {
    let deleted = state
        .with_db(move |db| Ok(db.delete_breed(&breed_id.to_string())?))
        .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Breed {} deleted", breed_id);
    Ok(Redirect::to("/cats/breeds"))
}
