//! Display model for the results panel.
//!
//! Everything the panel draws is derived here from a `VoteTally`, so the
//! numbers can be checked without a terminal.

use crate::api::types::{VoteOption, VoteTally};

/// One row of the results panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionResult {
    pub option: VoteOption,
    /// Literal vote count, e.g. `"3"`.
    pub count: String,
    /// Share of the total in `0..=100`.
    pub percent: u8,
    /// `"75%"`.
    pub percent_label: String,
}

impl OptionResult {
    /// Width of the bar as a percentage of the available track.
    pub fn bar_percent(&self) -> u16 {
        u16::from(self.percent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub cats: OptionResult,
    pub dogs: OptionResult,
    pub total: String,
}

impl ResultsView {
    pub fn from_tally(tally: &VoteTally) -> Self {
        let row = |option: VoteOption| {
            let percent = tally.percentage(option);
            OptionResult {
                option,
                count: tally.count(option).to_string(),
                percent,
                percent_label: format!("{percent}%"),
            }
        };
        Self {
            cats: row(VoteOption::Cats),
            dogs: row(VoteOption::Dogs),
            total: tally.total().to_string(),
        }
    }

    pub fn get(&self, option: VoteOption) -> &OptionResult {
        match option {
            VoteOption::Cats => &self.cats,
            VoteOption::Dogs => &self.dogs,
        }
    }
}
