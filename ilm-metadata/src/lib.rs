//! Immutable cluster metadata for index lifecycle management.
//!
//! A [`Metadata`] snapshot holds every [`IndexMetadata`] plus the lifecycle
//! policy registry ([`IndexLifecycleMetadata`]). Snapshots are values: an edit
//! derives a new snapshot and never touches the one it started from, so a
//! snapshot can be shared freely between readers once published.
//!
//! ## Components
//!
//! - **Settings / IndexMetadata**: the entities that reference policies via
//!   `index.lifecycle.name`
//! - **Policy registry**: name-ordered policies plus the operation mode
//! - **Validation**: reference scan that blocks deleting a policy in use
//! - **Mutation**: pure registry edits (remove, put) and their metadata-level
//!   wrappers
//!
//! # Example
//!
//! ```
//! use ilm_metadata::{delete_policy, store_policy, IndexMetadata, LifecyclePolicy, Metadata};
//! use std::collections::BTreeMap;
//!
//! let metadata = Metadata::builder()
//!     .put_index(IndexMetadata::with_policy("logs-1", "hot-warm"))
//!     .build();
//! let metadata = store_policy(&metadata, LifecyclePolicy::new("hot-warm"), BTreeMap::new(), chrono::Utc::now());
//!
//! assert!(delete_policy(&metadata, "hot-warm").is_err());
//! ```

mod error;
mod index;
mod metadata;
pub mod mutate;
mod policy;
mod settings;
pub mod validate;

pub use error::{MetadataError, MetadataResult};
pub use index::IndexMetadata;
pub use metadata::{Metadata, MetadataBuilder};
pub use mutate::{delete_policy, put_policy, remove_policy, store_policy};
pub use policy::{
    IndexLifecycleMetadata, LifecyclePolicy, LifecyclePolicyMetadata, OperationMode, Phase,
};
pub use settings::{Settings, SettingsBuilder, LIFECYCLE_NAME_SETTING};
pub use validate::{indices_using_policy, validate_not_referenced};
