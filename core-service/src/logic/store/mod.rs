//! Store Module - Model Persistence
//!
//! # Architecture
//! - `types.rs`: `ModelArtifact` (format tag, layout, forest)
//! - `validate.rs`: Format/layout/structure validation
//! - `storage.rs`: Atomic file save, validated load
//!
//! # Failure Strategy
//! Anything that fails validation is reported as `Corruption`; the detector
//! falls back to bootstrap training rather than serving it.

pub mod storage;
pub mod types;
pub mod validate;


pub use storage::ModelStore;
pub use types::ModelArtifact;
pub use validate::validate_artifact;
