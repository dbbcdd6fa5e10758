//! Route handlers.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::dates::{self, DateTriple};
use crate::http::response::{elapsed, AgeResponse, ApiError, PresenceResponse};
use crate::http::server::AppState;

/// `GET /`: route discovery.
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "OK",
        "routes": {
            "/discord/:userId": "discord data",
            "/:month/:day/:year": "get age & next birthday"
        }
    }))
}

/// `GET /{month}/{day}/{year}`: age and next birthday.
pub async fn age(
    Path((month, day, year)): Path<(String, String, String)>,
) -> Result<Json<AgeResponse>, ApiError> {
    let start = Instant::now();

    let triple = DateTriple::parse(&month, &day, &year)?;
    let result = dates::age_now(&triple)?;

    Ok(Json(AgeResponse {
        age: result.age,
        next_birthday: result.next_birthday_description(),
        timetook: elapsed(start),
    }))
}

/// `GET /discord/{user_id}`: filtered presence snapshot.
pub async fn discord(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceResponse>, ApiError> {
    let start = Instant::now();

    let snapshot = state.presence.fetch(&user_id).await?;

    Ok(Json(PresenceResponse {
        snapshot,
        timetook: elapsed(start),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
