use rand::Rng;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::db::repository;
use crate::error::AppError;

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 32;

/// Uppercase letters and digits minus the easily confused `0 O 1 I`.
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const MAX_GENERATE_ATTEMPTS: usize = 16;

/// Random passcode of `length` characters.
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Check a passcode typed by a teacher and return it trimmed.
pub fn validate(raw: &str) -> Result<String, AppError> {
    let passcode = raw.trim();

    if passcode.is_empty() {
        return Err(AppError::BadRequest("Passcode is required".to_string()));
    }
    let len = passcode.chars().count();
    if len < MIN_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Passcode must be at least {MIN_LENGTH} characters"
        )));
    }
    if len > MAX_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Passcode must be at most {MAX_LENGTH} characters"
        )));
    }
    if !passcode.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest(
            "Passcode may only contain letters and digits".to_string(),
        ));
    }

    Ok(passcode.to_string())
}

/// Generate a passcode no class is using yet.
pub async fn generate_unique(db: &SqlitePool, length: usize) -> Result<String, AppError> {
    for attempt in 1..=MAX_GENERATE_ATTEMPTS {
        let candidate = generate(length);
        if !repository::passcode_exists(db, &candidate).await? {
            debug!("generated passcode after {} attempt(s)", attempt);
            return Ok(candidate);
        }
    }

    warn!(
        "could not find a free passcode of length {} in {} attempts",
        length, MAX_GENERATE_ATTEMPTS
    );
    Err(AppError::Conflict(
        "Failed to generate a unique passcode".to_string(),
    ))
}
