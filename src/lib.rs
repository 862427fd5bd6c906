pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod passcode;
pub mod services;
pub mod state;
