//! Data models for action transfer.
//!
//! - [`MappingConfig`] / [`BoneMapEntry`]: the ordered source to target bone-name mapping
//! - [`Skeleton`] and the [`BoneGraph`] / [`ActionSlot`] traits: read-only bone trees and
//!   the active-action reference of a skeleton object
//! - [`Action`] / [`FCurve`] / [`DataPath`]: animation curves and the bone-reference grammar
//!   of their data paths
//! - [`Scene`]: armatures and actions read from a scene file by the CLI
//! - [`Settings`]: tool settings loaded by [`ConfigManager`](crate::config::ConfigManager)

pub mod action;
pub mod config;
pub mod mapping;
pub mod scene;
pub mod skeleton;

pub use action::{Action, DataPath, FCurve, Keyframe};
pub use config::{MappingFormat, Settings};
pub use mapping::{BoneMapEntry, MappingConfig, Side};
pub use scene::Scene;
pub use skeleton::{ActionSlot, BoneGraph, BoneId, Skeleton};
