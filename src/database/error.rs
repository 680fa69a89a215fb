use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors surfaced by the data-access layer.
///
/// `NotFound`, `Duplicate` and `InvalidInput` are the cases callers branch
/// on; everything else is wrapped as `Database` with the operation that
/// failed and the original sqlx error preserved as the source.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("entity not found")]
    NotFound,

    #[error("entity already exists")]
    Duplicate,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{message}")]
    Database {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    #[error("transaction failed: {source}; rollback also failed: {rollback}")]
    RollbackFailed {
        source: Box<DbError>,
        rollback: sqlx::Error,
    },
}

impl DbError {
    /// Translate a sqlx error into the domain taxonomy.
    ///
    /// "No rows" becomes `NotFound`; unique and primary-key constraint
    /// violations become `Duplicate`; anything else is wrapped with the
    /// operation label. Foreign-key and not-null violations are NOT
    /// auto-classified - use the predicates below where a caller needs
    /// to distinguish them.
    pub fn wrap(err: sqlx::Error, operation: &str) -> DbError {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            err => {
                if matches!(constraint_kind(&err), Some(ErrorKind::UniqueViolation)) {
                    return DbError::Duplicate;
                }
                DbError::Database {
                    message: format!("{operation} failed"),
                    source: Some(err),
                }
            }
        }
    }

    pub(crate) fn database(message: impl Into<String>) -> DbError {
        DbError::Database {
            message: message.into(),
            source: None,
        }
    }

    /// True if the underlying failure was a foreign-key constraint violation.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self.source_kind(),
            Some(ErrorKind::ForeignKeyViolation)
        )
    }

    /// True if the underlying failure was a NOT NULL constraint violation.
    pub fn is_not_null_violation(&self) -> bool {
        matches!(self.source_kind(), Some(ErrorKind::NotNullViolation))
    }

    fn source_kind(&self) -> Option<ErrorKind> {
        match self {
            DbError::Database {
                source: Some(err), ..
            } => constraint_kind(err),
            _ => None,
        }
    }
}

fn constraint_kind(err: &sqlx::Error) -> Option<ErrorKind> {
    err.as_database_error().map(|db| db.kind())
}

/// Verify that a mutation affected exactly the expected number of rows.
///
/// Zero rows means the target did not exist. Any other mismatch is a
/// database error - a delete or update by primary key must never touch
/// more rows than intended.
pub fn check_rows_affected(affected: u64, expected: u64) -> Result<(), DbError> {
    if affected == 0 {
        return Err(DbError::NotFound);
    }
    if affected != expected {
        return Err(DbError::database(format!(
            "expected {expected} rows affected, got {affected}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_translates_row_not_found() {
        let err = DbError::wrap(sqlx::Error::RowNotFound, "get project by id");
        assert!(matches!(err, DbError::NotFound));
    }

    #[test]
    fn wrap_labels_other_errors() {
        let err = DbError::wrap(sqlx::Error::PoolClosed, "get all projects");
        match err {
            DbError::Database { message, source } => {
                assert_eq!(message, "get all projects failed");
                assert!(source.is_some());
            }
            other => panic!("expected Database, got {other:?}"),
        }
    }

    #[test]
    fn wrapped_errors_expose_the_original_cause() {
        use std::error::Error;

        let err = DbError::wrap(sqlx::Error::PoolClosed, "create news");
        assert!(err.source().is_some());
    }

    #[test]
    fn rows_affected_zero_is_not_found() {
        assert!(matches!(check_rows_affected(0, 1), Err(DbError::NotFound)));
    }

    #[test]
    fn rows_affected_mismatch_is_database_error() {
        match check_rows_affected(2, 1) {
            Err(DbError::Database { message, .. }) => {
                assert!(message.contains("expected 1"));
                assert!(message.contains("got 2"));
            }
            other => panic!("expected Database, got {other:?}"),
        }
    }

    #[test]
    fn rows_affected_exact_match_passes() {
        assert!(check_rows_affected(1, 1).is_ok());
    }

    #[test]
    fn predicates_are_false_for_non_constraint_errors() {
        let err = DbError::wrap(sqlx::Error::PoolClosed, "link member");
        assert!(!err.is_foreign_key_violation());
        assert!(!err.is_not_null_violation());
        assert!(!DbError::NotFound.is_foreign_key_violation());
    }
}
