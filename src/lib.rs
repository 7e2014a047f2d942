//! claimform - form progression and validation for multi-session benefits claims
//!
//! The engine is a set of pure functions over a claim snapshot: the page
//! registry describes the wizard steps, validation schemas are built per step
//! (and per segment on repeatable steps), the reconciler merges a restored
//! partial claim with verified identity data, and the progress resolver picks
//! the step a returning claimant resumes on. The `rest` and `store` modules
//! wrap the engine for serving.

pub mod claim;
pub mod config;
pub mod logging;
pub mod occupation;
pub mod pages;
pub mod progress;
pub mod reconcile;
pub mod rest;
pub mod segment;
pub mod store;
pub mod validation;

pub use claim::{Claim, IdentityBundle, Snapshot};
pub use config::Config;
pub use pages::{PageDefinition, PageRegistry};
pub use progress::{resolve, Resolution, ResumePoint};
pub use reconcile::{reconcile, DerivedFlags};
pub use segment::Segment;
pub use validation::{Schema, SchemaContext, ValidationFailure};
