//! Reasons an employment relationship ended, and what each one asks for.

use serde::{Deserialize, Serialize};

/// Why the claimant is no longer working (or working less) for an employer.
///
/// Each variant decides its own follow-up options and whether the claimant
/// must explain in a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationReason {
    LaidOff,
    Fired,
    StillEmployed,
    Quit,
    Strike,
    Retired,
    Shutdown,
}

impl SeparationReason {
    /// Returns all reasons in display order
    pub fn all() -> &'static [SeparationReason] {
        &[
            SeparationReason::LaidOff,
            SeparationReason::Fired,
            SeparationReason::StillEmployed,
            SeparationReason::Quit,
            SeparationReason::Strike,
            SeparationReason::Retired,
            SeparationReason::Shutdown,
        ]
    }

    /// Stored key for this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            SeparationReason::LaidOff => "laid_off",
            SeparationReason::Fired => "fired",
            SeparationReason::StillEmployed => "still_employed",
            SeparationReason::Quit => "quit",
            SeparationReason::Strike => "strike",
            SeparationReason::Retired => "retired",
            SeparationReason::Shutdown => "shutdown",
        }
    }

    /// Parse a reason from its stored key
    pub fn from_key(key: &str) -> Option<SeparationReason> {
        Self::all().iter().copied().find(|r| r.as_str() == key)
    }

    /// Sub-options the claimant picks from; empty means none are asked
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            SeparationReason::LaidOff => &[
                "lack_of_work",
                "position_eliminated",
                "temporary_assignment_ended",
                "seasonal",
            ],
            SeparationReason::Fired => &[
                "misconduct",
                "unsatisfactory_work_performance",
                "attendance",
                "violated_policy",
                "other",
            ],
            SeparationReason::StillEmployed => &[
                "hours_reduced_by_employer",
                "hours_reduced_by_me",
                "leave_of_absence",
                "on_call",
            ],
            SeparationReason::Quit => &[
                "health_reasons",
                "family_obligations",
                "relocation",
                "working_conditions",
                "other_job",
                "other",
            ],
            SeparationReason::Strike
            | SeparationReason::Retired
            | SeparationReason::Shutdown => &[],
        }
    }

    /// Whether the claimant must explain the separation in their own words
    pub fn comment_required(&self) -> bool {
        match self {
            SeparationReason::Fired
            | SeparationReason::StillEmployed
            | SeparationReason::Quit
            | SeparationReason::Retired => true,
            SeparationReason::LaidOff | SeparationReason::Strike | SeparationReason::Shutdown => {
                false
            }
        }
    }

    /// Whether the relationship actually ended, so a last work date exists
    pub fn ends_employment(&self) -> bool {
        !matches!(self, SeparationReason::StillEmployed)
    }

    /// Whether the claimant is asked about being recalled
    pub fn asks_about_recall(&self) -> bool {
        matches!(
            self,
            SeparationReason::LaidOff | SeparationReason::Strike | SeparationReason::Shutdown
        )
    }

    /// Keys of every reason satisfying a predicate
    pub fn keys_where(pred: impl Fn(&SeparationReason) -> bool) -> Vec<&'static str> {
        Self::all()
            .iter()
            .filter(|&r| pred(r))
            .map(SeparationReason::as_str)
            .collect()
    }
}

impl std::fmt::Display for SeparationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_through_serde() {
        for reason in SeparationReason::all() {
            let json = serde_json::to_string(reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
            assert_eq!(SeparationReason::from_key(reason.as_str()), Some(*reason));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(SeparationReason::from_key("vanished"), None);
    }

    #[test]
    fn test_still_employed_has_no_last_day() {
        assert!(!SeparationReason::StillEmployed.ends_employment());
        assert!(SeparationReason::Fired.ends_employment());
    }

    #[test]
    fn test_comment_required_reasons() {
        let keys = SeparationReason::keys_where(SeparationReason::comment_required);
        assert_eq!(keys, vec!["fired", "still_employed", "quit", "retired"]);
    }

    #[test]
    fn test_reasons_without_options() {
        let keys = SeparationReason::keys_where(|r| r.options().is_empty());
        assert_eq!(keys, vec!["strike", "retired", "shutdown"]);
    }
}
