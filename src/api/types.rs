//! Channel message types and plain-data payloads shared by the UI loop and the
//! controller task. Nothing here holds a `reqwest` handle, so the TUI side stays
//! free of transport concerns.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::client::ApiError;

// ─── Vote options ───────────────────────────────────────────────────────────

/// The fixed set of things a user can vote for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOption {
    Cats,
    Dogs,
}

impl VoteOption {
    pub const ALL: [VoteOption; 2] = [VoteOption::Cats, VoteOption::Dogs];

    /// Path segment used by `POST /vote/{option}`.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteOption::Cats => "cats",
            VoteOption::Dogs => "dogs",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VoteOption::Cats => "Cats",
            VoteOption::Dogs => "Dogs",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            VoteOption::Cats => "🐱",
            VoteOption::Dogs => "🐶",
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteOption {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cats" => Ok(VoteOption::Cats),
            "dogs" => Ok(VoteOption::Dogs),
            _ => Err(ApiError::Validation(format!(
                "invalid option \"{s}\", expected \"cats\" or \"dogs\""
            ))),
        }
    }
}

// ─── Backend payloads ───────────────────────────────────────────────────────

/// Vote counts as returned by `GET /results`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteTally {
    pub cats: u64,
    pub dogs: u64,
}

impl VoteTally {
    #[allow(dead_code)]
    pub fn new(cats: u64, dogs: u64) -> Self {
        Self { cats, dogs }
    }

    pub fn total(&self) -> u64 {
        self.cats.saturating_add(self.dogs)
    }

    pub fn count(&self, option: VoteOption) -> u64 {
        match option {
            VoteOption::Cats => self.cats,
            VoteOption::Dogs => self.dogs,
        }
    }

    /// Share of the total for `option`, rounded half away from zero.
    /// Always 0 when nobody has voted yet.
    pub fn percentage(&self, option: VoteOption) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let pct = (self.count(option) as f64 * 100.0 / total as f64).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Decoded vote response plus the exact HTTP status it came with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    pub ok: bool,
    pub voted: Option<VoteOption>,
    pub status: u16,
}

// ─── UI → Controller commands ───────────────────────────────────────────────

/// Commands sent from the TUI main loop to the controller task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// Submit a vote, then refetch the tally.
    Vote(VoteOption),
    /// Refetch the tally right now, outside the poll schedule.
    Refresh,
    /// Flip the auto-refresh flag.
    ToggleAutoRefresh,
    /// Terminal focus changed.
    SetVisible(bool),
    /// Stop polling and exit the task.
    Shutdown,
}

// ─── Controller → UI events ─────────────────────────────────────────────────

/// Severity attached to every toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// Controller lifecycle, mirrored in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Ready,
    Failed,
    Closed,
}

/// Events emitted by the controller back to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    /// Lifecycle transition.
    State(LifecycleState),
    /// Fresh tally to render.
    Tally(VoteTally),
    /// Busy overlay: `Some(message)` to show, `None` to hide.
    Busy(Option<String>),
    /// A vote settled. `Err` carries the user-facing message.
    VoteFinished {
        option: VoteOption,
        outcome: Result<VoteReceipt, String>,
    },
    /// Auto-refresh flag changed.
    AutoRefreshChanged(bool),
    /// A toast to show. `None` duration means the configured default.
    Notify {
        message: String,
        severity: Severity,
        duration: Option<Duration>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_total_gives_zero_percentages() {
        let tally = VoteTally::default();
        assert_eq!(tally.percentage(VoteOption::Cats), 0);
        assert_eq!(tally.percentage(VoteOption::Dogs), 0);
    }

    #[test]
    fn percentages_round_and_stay_in_range() {
        let tally = VoteTally::new(3, 1);
        assert_eq!(tally.percentage(VoteOption::Cats), 75);
        assert_eq!(tally.percentage(VoteOption::Dogs), 25);

        for (cats, dogs) in [(1, 2), (2, 1), (1, 0), (0, 7), (333, 667), (1, 1_000_000)] {
            let tally = VoteTally::new(cats, dogs);
            let c = tally.percentage(VoteOption::Cats);
            let d = tally.percentage(VoteOption::Dogs);
            assert!(c <= 100 && d <= 100);
            assert!((99..=101).contains(&(c as u16 + d as u16)), "{cats}/{dogs}");
        }
    }

    #[test]
    fn option_parsing_rejects_unknown_names() {
        assert_eq!("cats".parse::<VoteOption>().ok(), Some(VoteOption::Cats));
        assert_eq!("dogs".parse::<VoteOption>().ok(), Some(VoteOption::Dogs));
        for name in ["birds", "DOGS", "Cats", " cats ", ""] {
            assert!(
                matches!(name.parse::<VoteOption>(), Err(ApiError::Validation(_))),
                "{name:?} accepted"
            );
        }
    }

    #[test]
    fn tally_missing_fields_default_to_zero() {
        let tally: VoteTally = serde_json::from_str(r#"{"cats": 4}"#).unwrap();
        assert_eq!(tally, VoteTally::new(4, 0));
    }
}
