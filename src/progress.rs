//! Resume-point resolution.
//!
//! Walks the registry against a snapshot and stops at the first step (or
//! repeated segment) whose schema fails. Validation failures are the normal
//! outcome here and never escape as errors.

use serde::{Deserialize, Serialize};

use crate::claim::Snapshot;
use crate::pages::{PageDefinition, PageRegistry, RepeatSpec};
use crate::segment::Segment;
use crate::validation::SchemaContext;

/// Where a claimant should continue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResumePoint {
    /// A plain step that does not yet validate
    Page { index: usize },
    /// One entry of a repeatable step
    Segment { index: usize, segment: Segment },
    /// Every step validates
    Complete,
}

/// A resume point and the path that renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub point: ResumePoint,
    pub path: String,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.point == ResumePoint::Complete
    }
}

/// Find the furthest point the snapshot supports.
///
/// Safe to re-run after every change; the scan is bounded by the registry
/// length and, within a repeatable step, by the tracking array.
pub fn resolve(
    registry: &PageRegistry,
    ctx: &SchemaContext,
    snapshot: &Snapshot,
    base: &str,
) -> Resolution {
    for (index, page) in registry.pages().iter().enumerate() {
        let point = match &page.repeat {
            Some(repeat) => probe_segments(page, repeat, index, ctx, snapshot),
            None => check_page(page, index, ctx, snapshot),
        };

        if let Some(point) = point {
            let segment = match point {
                ResumePoint::Segment { segment, .. } => Some(segment),
                _ => None,
            };
            return Resolution {
                point,
                path: registry.path_for(base, index, segment),
            };
        }
    }

    tracing::debug!("Every step validates");
    Resolution {
        point: ResumePoint::Complete,
        path: registry.final_path(base),
    }
}

fn check_page(
    page: &PageDefinition,
    index: usize,
    ctx: &SchemaContext,
    snapshot: &Snapshot,
) -> Option<ResumePoint> {
    match page.base_schema(ctx).validate(snapshot) {
        Ok(()) => None,
        Err(failure) => {
            tracing::debug!(
                page = page.slug,
                errors = ?failure.paths(),
                "Resuming at step"
            );
            Some(ResumePoint::Page { index })
        }
    }
}

/// Probe segments 0, 1, 2, ... until one fails or no further entry is expected
fn probe_segments(
    page: &PageDefinition,
    repeat: &RepeatSpec,
    index: usize,
    ctx: &SchemaContext,
    snapshot: &Snapshot,
) -> Option<ResumePoint> {
    let mut position = 0;
    loop {
        let segment = Segment::Index(position);
        if let Err(failure) = (repeat.segment_schema)(ctx, position).validate(snapshot) {
            tracing::debug!(
                page = page.slug,
                segment = position,
                errors = ?failure.paths(),
                "Resuming at segment"
            );
            return Some(ResumePoint::Segment { index, segment });
        }
        if !(repeat.repeatable)(segment, snapshot) {
            return None;
        }
        position += 1;
    }
}
