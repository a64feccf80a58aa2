use axum::http::StatusCode;
use tracing::error;

/// Errors surfaced by the repo layer. Aggregation reads never produce
/// `NotFound` — an empty result set is a valid answer there.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record belongs to another user")]
    NotOwner,
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::NotOwner => StatusCode::FORBIDDEN,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Map a repo error onto the `(StatusCode, String)` rejection shape the
/// handlers use. Database failures are logged here and not echoed back.
pub fn http(e: StoreError) -> (StatusCode, String) {
    if let StoreError::Database(db) = &e {
        error!(error = %db, "database error");
        return (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into());
    }
    (e.status(), e.to_string())
}

/// Detect a Postgres unique violation (duplicate username/email) and fold
/// everything else into `Database`.
pub fn from_sqlx(e: sqlx::Error, conflict_msg: &'static str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return StoreError::Conflict(conflict_msg);
        }
    }
    StoreError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(StoreError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(StoreError::NotOwner.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            StoreError::Conflict("taken").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            StoreError::Database(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_errors_are_not_echoed_to_clients() {
        let (status, body) = http(StoreError::Database(sqlx::Error::PoolClosed));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "internal error");
    }

    #[test]
    fn ownership_violation_message_is_explicit() {
        let (status, body) = http(StoreError::NotOwner);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("another user"));
    }
}
