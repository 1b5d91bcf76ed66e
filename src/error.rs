use axum::http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failure kinds reported by the service layer. Handlers map each kind to a
/// transport status code and a stable machine-readable code; the message is
/// meant for humans.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Range(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Empty(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("you cannot subscribe to yourself")]
    SelfReference,

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// Maps an insert failure to the outcome of a lost race: when two
    /// concurrent adds of the same pair pass the existence check, the loser
    /// hits the unique index and must report the same conflict as a plain
    /// second add, not a 500.
    pub fn from_insert_race(err: DbErr, conflict_message: String) -> ServiceError {
        if is_unique_violation(err.sql_err().as_ref()) {
            ServiceError::Conflict(conflict_message)
        } else {
            ServiceError::Database(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_)
            | ServiceError::Range(_)
            | ServiceError::Duplicate(_)
            | ServiceError::Empty(_)
            | ServiceError::MissingField(_)
            | ServiceError::Validation(_)
            | ServiceError::SelfReference => StatusCode::BAD_REQUEST,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Range(_) => "RANGE_ERROR",
            ServiceError::Duplicate(_) => "DUPLICATE_ERROR",
            ServiceError::Empty(_) => "EMPTY_ERROR",
            ServiceError::MissingField(_) => "MISSING_FIELD",
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::SelfReference => "SELF_REFERENCE",
            ServiceError::Forbidden(_) => "ACCESS_DENIED",
            ServiceError::Database(_) => "DB_ERROR",
        }
    }
}

fn is_unique_violation(sql_err: Option<&SqlErr>) -> bool {
    matches!(sql_err, Some(SqlErr::UniqueConstraintViolation(_)))
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_are_detected() {
        let unique = SqlErr::UniqueConstraintViolation("duplicate key value".to_string());
        assert!(is_unique_violation(Some(&unique)));

        let fk = SqlErr::ForeignKeyConstraintViolation("violates fk".to_string());
        assert!(!is_unique_violation(Some(&fk)));
        assert!(!is_unique_violation(None));
    }

    #[test]
    fn non_race_insert_errors_stay_database_errors() {
        let err = ServiceError::from_insert_race(
            DbErr::Custom("connection reset".to_string()),
            "already there".to_string(),
        );
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
