pub mod models;
pub mod services;

// Re-export models and the engine entry point for external use
pub use models::*;
pub use services::engine::SlotEngine;
