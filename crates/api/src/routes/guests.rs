//! `GET /api/{id}`: one guest by invitation code.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use guestlist_db::schema::MAX_IDENTIFIER_LEN;
use guestlist_db::Guest;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_guest))
}

async fn get_guest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Guest>> {
    let id = normalize_code(&id)?;
    let guest = state
        .lookup
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Guest",
            id: id.clone(),
        })?;
    tracing::debug!(id = %id, "Guest found");
    Ok(Json(guest))
}

/// Codes are stored upper-cased; guests may type them in any case.
fn normalize_code(raw: &str) -> AppResult<String> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() || code.len() > MAX_IDENTIFIER_LEN {
        return Err(AppError::BadRequest(format!("Invalid invitation code {raw:?}")));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_trimmed_and_uppercased() {
        assert_eq!(normalize_code(" ab12cd ").unwrap(), "AB12CD");
        assert!(normalize_code("   ").is_err());
        assert!(normalize_code(&"A".repeat(65)).is_err());
    }
}
