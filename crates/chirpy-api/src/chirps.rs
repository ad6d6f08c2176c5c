use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use chirpy_db::{Chirp, MAX_CHIRP_LENGTH};
use chirpy_types::api::{ChirpQuery, ChirpResponse, CreateChirpRequest, SortOrder};

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::AuthUser;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replace profane words (case-insensitive, space-separated) with `****`.
/// Words with punctuation attached are left alone.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn chirp_response(chirp: Chirp) -> ChirpResponse {
    ChirpResponse {
        id: chirp.id,
        author_id: chirp.author_id,
        body: chirp.body,
    }
}

pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<ChirpResponse>), ApiError> {
    // Length is judged on what the user typed, before filtering.
    if req.body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ApiError::BadRequest("Chirp is too long".to_string()));
    }
    let body = clean_body(&req.body);

    let chirp = blocking(&state, move |s| Ok(s.db.create_chirp(auth.id, &body)?)).await?;
    Ok((StatusCode::CREATED, Json(chirp_response(chirp))))
}

pub async fn list_chirps(
    State(state): State<AppState>,
    query: Result<Query<ChirpQuery>, QueryRejection>,
) -> Result<Json<Vec<ChirpResponse>>, ApiError> {
    let Query(query) = query?;
    let author_id = query.author_id;
    let mut chirps = blocking(&state, move |s| Ok(s.db.list_chirps(author_id)?)).await?;

    if query.sort == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(Json(chirps.into_iter().map(chirp_response).collect()))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    chirp_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ChirpResponse>, ApiError> {
    let Path(chirp_id) = chirp_id?;
    let chirp = blocking(&state, move |s| Ok(s.db.get_chirp(chirp_id)?)).await?;
    Ok(Json(chirp_response(chirp)))
}

pub async fn delete_chirp(
    State(state): State<AppState>,
    chirp_id: Result<Path<u64>, PathRejection>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    let Path(chirp_id) = chirp_id?;
    blocking(&state, move |s| Ok(s.db.delete_chirp(chirp_id, auth.id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
