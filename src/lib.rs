// Action Transfer - move skeletal animation actions between differently named rigs
//
// This is the library crate containing the mapping, inference, validation and remap logic.
// The binary crate (main.rs) provides a command line host around it.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{PersistenceError, StateError, StructuralError, TransferError, ValidationError};
pub use models::{Action, BoneMapEntry, MappingConfig, Scene, Settings, Skeleton};
pub use state::{Session, SessionChange};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
