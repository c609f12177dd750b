//! Services module - the mapping and transfer algorithms.
//!
//! Every function here takes the [`MappingConfig`](crate::models::MappingConfig) it works
//! on as an explicit parameter; nothing holds hidden global state. Skeletons are read
//! through the [`BoneGraph`](crate::models::BoneGraph) trait so any host bone tree can
//! be plugged in.
//!
//! # Components
//!
//! - [`extremity`]: classifies bones as landmarks (head, hands, feet) by name
//! - [`inference`]: collects bones into a mapping and infers targets by walking matched
//!   landmark chains toward the root
//! - [`validation`]: checks a mapping against skeletons and an action
//! - [`persistence`]: mapping documents in YAML or JSON
//! - [`remap`]: rewrites curve data paths through a mapping, all-or-nothing
//!
//! # Usage Example
//!
//! ```ignore
//! use action_transfer::models::MappingConfig;
//! use action_transfer::services::{collect_from_pair, transfer_action};
//!
//! let mut mapping = MappingConfig::with_prefixes("mixamorig:", "");
//! collect_from_pair(&mut mapping, &source_rig, &target_rig)?;
//! let outcome = transfer_action(&mapping, &walk, Some(&mut target_rig))?;
//! println!("{}", outcome.report.summary());
//! ```

pub mod extremity;
pub mod inference;
pub mod persistence;
pub mod remap;
pub mod validation;

pub use extremity::{Landmark, LandmarkMap, find_extremities, find_landmarks};
pub use inference::{InferenceStats, collect_from_pair, collect_from_single, infer_hierarchy};
pub use persistence::{MappingDocument, load_from_path, save_to_path};
pub use remap::{CurveRemapper, RemapReport, TransferOutcome, transfer_action};
pub use validation::{check_action, check_against, check_complete, validate_action, validate_against};
