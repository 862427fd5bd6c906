use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::AppError;
use crate::passcode;

const DEFAULT_DATABASE_URL: &str = "sqlite://assignmenthub.db?mode=rwc";
const DEFAULT_HOST: [u8; 4] = [127, 0, 0, 1];
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PASSCODE_LENGTH: usize = 6;
const DEFAULT_RECENT_ASSIGNMENTS: usize = 5;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub passcode_length: usize,
    pub recent_assignments: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            passcode_length: DEFAULT_PASSCODE_LENGTH,
            recent_assignments: DEFAULT_RECENT_ASSIGNMENTS,
        }
    }
}

impl AppConfig {
    /// Read settings from the environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = parse_var("HOST", IpAddr::from(DEFAULT_HOST))?;
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let passcode_length = parse_var("PASSCODE_LENGTH", DEFAULT_PASSCODE_LENGTH)?;
        let recent_assignments = parse_var("RECENT_ASSIGNMENTS", DEFAULT_RECENT_ASSIGNMENTS)?;

        if !(passcode::MIN_LENGTH..=passcode::MAX_LENGTH).contains(&passcode_length) {
            return Err(AppError::BadRequest(format!(
                "PASSCODE_LENGTH must be between {} and {}",
                passcode::MIN_LENGTH,
                passcode::MAX_LENGTH
            )));
        }

        Ok(Self {
            database_url,
            host,
            port,
            passcode_length,
            recent_assignments,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
