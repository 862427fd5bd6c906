pub mod class_service;
pub mod ticker;

pub use class_service::ClassService;
pub use ticker::{CountdownTicker, TickerHandle};
