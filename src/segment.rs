//! Segment navigation for repeatable steps.
//!
//! A repeatable step (one screen per employer) is addressed by a segment
//! index appended to the step path. The first visit carries no segment at
//! all ([`Segment::NotStarted`]), which reads flags at index 0 but advances
//! straight to segment 1.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claim::Snapshot;
use crate::pages::PageRegistry;

/// A segment token that is not a non-negative integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("segment '{0}' is not a non-negative integer")]
pub struct MalformedSegment(pub String);

/// One repetition of a repeatable step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// First visit, no segment in the path yet
    NotStarted,
    Index(usize),
}

impl Segment {
    /// Position in the collection and its tracking array
    pub fn index(self) -> usize {
        match self {
            Segment::NotStarted => 0,
            Segment::Index(n) => n,
        }
    }

    /// Parse an optional path token; no token means the first visit
    pub fn from_token(token: Option<&str>) -> Result<Self, MalformedSegment> {
        match token {
            None => Ok(Segment::NotStarted),
            Some(token) => token.parse(),
        }
    }

    /// Path token, absent for the first visit
    pub fn token(self) -> Option<String> {
        match self {
            Segment::NotStarted => None,
            Segment::Index(n) => Some(n.to_string()),
        }
    }
}

impl FromStr for Segment {
    type Err = MalformedSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedSegment(s.to_string()));
        }
        s.parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| MalformedSegment(s.to_string()))
    }
}

/// Whether another entry follows the one at `segment`.
///
/// An empty tracking array, or one too short to reach the segment, means no.
pub fn repeatable(segment: Segment, tracking: &[bool]) -> bool {
    tracking.get(segment.index()).copied().unwrap_or(false)
}

/// Segment after `current`; unbounded, the repeat flag decides whether it is used
pub fn next_segment(current: Segment) -> Segment {
    match current {
        Segment::NotStarted => Segment::Index(1),
        Segment::Index(n) => Segment::Index(n + 1),
    }
}

/// Segment before `current`, or `None` when going back must leave the step
pub fn previous_segment(current: Segment) -> Option<Segment> {
    match current {
        Segment::NotStarted | Segment::Index(0) => None,
        Segment::Index(n) => Some(Segment::Index(n - 1)),
    }
}

/// Where the "continue" action leads from a step (and segment)
pub fn next_path(
    registry: &PageRegistry,
    base: &str,
    page_index: usize,
    segment: Segment,
    snapshot: &Snapshot,
) -> String {
    if let Some(repeat) = registry.get(page_index).and_then(|p| p.repeat.as_ref()) {
        if (repeat.repeatable)(segment, snapshot) {
            return registry.path_for(base, page_index, Some((repeat.next_segment)(segment)));
        }
    }

    if page_index + 1 < registry.len() {
        registry.path_for(base, page_index + 1, None)
    } else {
        registry.final_path(base)
    }
}

/// Where the "back" action leads, or `None` on the first step
pub fn previous_path(
    registry: &PageRegistry,
    base: &str,
    page_index: usize,
    segment: Segment,
    snapshot: &Snapshot,
) -> Option<String> {
    if let Some(repeat) = registry.get(page_index).and_then(|p| p.repeat.as_ref()) {
        if let Some(previous) = (repeat.previous_segment)(segment) {
            return Some(registry.path_for(base, page_index, Some(previous)));
        }
    }

    let previous_index = page_index.checked_sub(1)?;
    let previous_page = registry.get(previous_index)?;
    let landing = previous_page.repeat.as_ref().and_then(|repeat| {
        snapshot
            .claim
            .entry_count(repeat.collection)
            .checked_sub(1)
            .map(Segment::Index)
    });
    Some(registry.path_for(base, previous_index, landing))
}
