/// Unique constraint on `short_urls.short_code` (see `migrations/`).
pub const SHORT_CODE_CONSTRAINT: &str = "short_urls_short_code_key";

/// True only for a unique violation on the short code constraint.
///
/// This is the single retryable insert failure. Any other error, including a
/// unique violation on a different constraint, must propagate.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_CODE_CONSTRAINT))
}
