pub mod builder;
mod config;
use log::{debug, info, warn};

use std::fs;
use std::path::Path;

pub use crate::config::*;
use builder::Builder;

/// The parsed polls, in the order of the source.
///
/// A table is built once, either from a file with [`PollTable::from_path`] or
/// from lines with [`build_table`], and only read afterwards. An empty table
/// (for example `PollTable::default()`) answers all the queries with their
/// empty defaults.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct PollTable {
    pub(crate) records: Vec<PollRecord>,
    pub(crate) rejected: Vec<(usize, RowRejection)>,
}

impl PollTable {
    /// Reads and parses a poll file. A missing or unreadable file gives an empty table.
    pub fn from_path(path: impl AsRef<Path>) -> PollTable {
        build_table(&read_lines(path))
    }

    pub fn records(&self) -> &[PollRecord] {
        &self.records
    }

    /// The lines that were dropped, with their line number (1-based, the header is line 1).
    pub fn rejected(&self) -> &[(usize, RowRejection)] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Column views.

    pub fn months(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.month.as_str()).collect()
    }

    pub fn dates(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn samples(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.sample).collect()
    }

    pub fn sample_types(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.sample_type.as_str()).collect()
    }

    pub fn first_results(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.first_result).collect()
    }

    pub fn second_results(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.second_result).collect()
    }

    /// The candidate with the highest single result, along with that result.
    ///
    /// If the highest result is reached by both candidates, the outcome is
    /// [`HighestPolling::Even`]. Values are compared exactly.
    pub fn highest_polling_candidate(&self, rules: &QueryRules) -> HighestPolling {
        let max_result = self
            .records
            .iter()
            .flat_map(|r| [r.first_result, r.second_result])
            .reduce(f64::max);
        let max_result = match max_result {
            Some(x) => x,
            None => return HighestPolling::NoData,
        };

        let first_has_max = self.records.iter().any(|r| r.first_result == max_result);
        let second_has_max = self.records.iter().any(|r| r.second_result == max_result);
        debug!(
            "highest_polling_candidate: max {} first: {} second: {}",
            max_result, first_has_max, second_has_max
        );
        if first_has_max && second_has_max {
            HighestPolling::Even(max_result)
        } else if first_has_max {
            HighestPolling::Leader {
                label: rules.candidates.first.to_string(),
                value: max_result,
            }
        } else {
            HighestPolling::Leader {
                label: rules.candidates.second.to_string(),
                value: max_result,
            }
        }
    }

    /// The average result of each candidate over the polls of likely voters.
    ///
    /// Both averages are `0.0` when no poll has the likely voters sample type.
    pub fn likely_voter_polling_average(&self, rules: &QueryRules) -> CandidatePair {
        let label: &str = &rules.likely_voters_label;
        let likely: Vec<&PollRecord> = self
            .records
            .iter()
            .filter(|r| r.sample_type.trim() == label)
            .collect();
        debug!(
            "likely_voter_polling_average: {} of {} polls with sample type {:?}",
            likely.len(),
            self.records.len(),
            label
        );
        if likely.is_empty() {
            return CandidatePair::ZERO;
        }
        average(&likely)
    }

    /// The change between the average of the earliest polls and the average
    /// of the latest polls, for each candidate. Positive values are increases.
    ///
    /// The windows are taken in table order, the dates are not looked at. They
    /// overlap when the table holds less than two windows worth of polls. Both
    /// changes are `0.0` when the table is smaller than one window.
    pub fn polling_history_change(&self, rules: &QueryRules) -> CandidatePair {
        let window = rules.history_window;
        let count = self.records.len();
        if window == 0 || count < window {
            debug!(
                "polling_history_change: {} polls, window of {}: not enough data",
                count, window
            );
            return CandidatePair::ZERO;
        }
        let earliest: Vec<&PollRecord> = self.records[..window].iter().collect();
        let latest: Vec<&PollRecord> = self.records[count - window..].iter().collect();
        let early_avg = average(&earliest);
        let late_avg = average(&latest);
        debug!(
            "polling_history_change: earliest {:?} latest {:?}",
            early_avg, late_avg
        );
        CandidatePair {
            first: late_avg.first - early_avg.first,
            second: late_avg.second - early_avg.second,
        }
    }
}

// Must not be called with an empty slice.
fn average(records: &[&PollRecord]) -> CandidatePair {
    let n = records.len() as f64;
    CandidatePair {
        first: records.iter().map(|r| r.first_result).sum::<f64>() / n,
        second: records.iter().map(|r| r.second_result).sum::<f64>() / n,
    }
}

/// Reads all the lines of a file.
///
/// A missing or unreadable file is not an error: it gives no lines.
pub fn read_lines(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => {
            let lines: Vec<String> = contents.lines().map(|l| l.to_string()).collect();
            debug!("read_lines: {:?}: {} lines", path, lines.len());
            lines
        }
        Err(e) => {
            warn!("read_lines: could not read {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Builds a table from the lines of a poll file.
///
/// The first line is the header and is skipped. The lines that cannot be
/// parsed are left out of the table.
pub fn build_table<S: AsRef<str>>(lines: &[S]) -> PollTable {
    let mut builder = Builder::new();
    for (idx, line) in lines.iter().enumerate().skip(1) {
        if let Err(rejection) = builder.add_line(idx + 1, line.as_ref()) {
            debug!("build_table: skipping line {}: {}", idx + 1, rejection);
        }
    }
    let table = builder.build();
    info!(
        "build_table: {} polls read, {} lines skipped",
        table.len(),
        table.rejected().len()
    );
    table
}

/// Runs all the queries over a table.
pub fn summarize(table: &PollTable, rules: &QueryRules) -> PollSummary {
    PollSummary {
        rows: table.len(),
        rejected_rows: table.rejected().len(),
        highest_polling: table.highest_polling_candidate(rules),
        likely_voter_average: table.likely_voter_polling_average(rules),
        polling_history_change: table.polling_history_change(rules),
    }
}
