//! Data Transfer Objects for the REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::claim::{Claim, IdentityBundle, Snapshot};
use crate::occupation::OccupationMatch;
use crate::pages::PageDefinition;
use crate::progress::{Resolution, ResumePoint};
use crate::reconcile::DerivedFlags;

// =============================================================================
// Health
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Pages
// =============================================================================

/// One wizard step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    /// 1-based position for the step indicator
    pub number: usize,
    pub slug: String,
    pub heading: String,
    pub repeatable: bool,
    /// Claim array repeated over, for repeatable steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl PageResponse {
    pub fn new(index: usize, page: &PageDefinition) -> Self {
        Self {
            number: index + 1,
            slug: page.slug.to_string(),
            heading: page.heading.to_string(),
            repeatable: page.is_repeatable(),
            collection: page.repeat.as_ref().map(|r| r.collection.to_string()),
        }
    }
}

// =============================================================================
// Claims
// =============================================================================

/// A claim plus derived flags as exchanged with the wizard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SnapshotPayload {
    /// Persisted claim fields
    #[schema(value_type = Object)]
    pub claim: Claim,
    /// `LOCAL_` branching flags; derived from the claim when omitted
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub flags: Option<DerivedFlags>,
}

impl SnapshotPayload {
    pub fn into_snapshot(self) -> Snapshot {
        let flags = self
            .flags
            .unwrap_or_else(|| DerivedFlags::derive(&self.claim));
        Snapshot::new(self.claim, flags)
    }
}

impl From<Snapshot> for SnapshotPayload {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            claim: snapshot.claim,
            flags: Some(snapshot.flags),
        }
    }
}

/// Start or resume a claimant's session
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ResumeRequest {
    /// Verified identity attributes, when available
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub identity: Option<IdentityBundle>,
}

/// Where to resume and with which values
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResumeResponse {
    pub snapshot: SnapshotPayload,
    /// `page`, `segment` or `complete`
    #[schema(value_type = Object)]
    pub point: ResumePoint,
    pub path: String,
    /// Whether a saved partial claim was found
    pub restored: bool,
}

impl ResumeResponse {
    pub fn new(snapshot: Snapshot, resolution: Resolution, restored: bool) -> Self {
        Self {
            snapshot: snapshot.into(),
            point: resolution.point,
            path: resolution.path,
            restored,
        }
    }
}

/// Check one step (or one segment of a repeatable step)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateRequest {
    pub page: String,
    /// Segment token; omitted on the first visit
    #[serde(default)]
    pub segment: Option<String>,
    pub snapshot: SnapshotPayload,
}

/// Result of a successful validation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// Submit a step's values
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepSubmission {
    /// Segment token; omitted on the first visit
    #[serde(default)]
    pub segment: Option<String>,
    pub snapshot: SnapshotPayload,
}

/// Navigation after an accepted submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StepResponse {
    pub next_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
    /// The claim passed every step and went to the completed store
    pub completed: bool,
    /// The claim as saved, with "same as" answers mirrored
    #[schema(value_type = Object)]
    pub claim: Value,
    /// Set when the save failed; navigation stands regardless
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
}

// =============================================================================
// Occupations
// =============================================================================

/// Occupation search query
#[derive(Debug, Deserialize, IntoParams)]
pub struct OccupationQuery {
    /// Free-text job title or duties
    pub q: String,
    /// Maximum results; capped by server configuration
    pub limit: Option<usize>,
}

/// One occupation, optionally with its search score
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OccupationResponse {
    pub code: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl From<&crate::occupation::Occupation> for OccupationResponse {
    fn from(o: &crate::occupation::Occupation) -> Self {
        Self {
            code: o.code.clone(),
            title: o.title.clone(),
            description: o.description.clone(),
            examples: o.examples.clone(),
            score: None,
        }
    }
}

impl From<OccupationMatch<'_>> for OccupationResponse {
    fn from(m: OccupationMatch<'_>) -> Self {
        Self {
            score: Some(m.rank()),
            ..Self::from(m.occupation)
        }
    }
}
