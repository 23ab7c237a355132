// ********* Input data structures ***********

use std::borrow::Cow;
use std::error::Error;
use std::fmt::Display;

/// One poll, as read from a single line of the input.
///
/// The fields follow the column order of the input file:
/// `month,date,sample,sample type,<first candidate>,<second candidate>`.
#[derive(PartialEq, Debug, Clone)]
pub struct PollRecord {
    pub month: String,
    /// Day of the month.
    pub date: i64,
    /// Number of people sampled.
    pub sample: i64,
    /// For example `Likely Voters` or `Registered Voters`.
    pub sample_type: String,
    /// Percentage for the first candidate (0-100 scale).
    pub first_result: f64,
    /// Percentage for the second candidate (0-100 scale).
    pub second_result: f64,
}

/// The columns of a poll line, in file order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum PollColumn {
    Month,
    Date,
    Sample,
    SampleType,
    FirstResult,
    SecondResult,
}

impl PollColumn {
    /// Number of fields on a poll line.
    pub const FIELD_COUNT: usize = 6;

    pub fn name(&self) -> &'static str {
        match self {
            PollColumn::Month => "month",
            PollColumn::Date => "date",
            PollColumn::Sample => "sample",
            PollColumn::SampleType => "sample type",
            PollColumn::FirstResult => "first result",
            PollColumn::SecondResult => "second result",
        }
    }
}

/// The reason a line was left out of the table.
///
/// Rejected lines are never reported as errors to the caller: they are
/// simply absent from the table. The builder keeps them around so that
/// front ends can tell how much of the input was dropped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RowRejection {
    /// The line did not split into exactly six fields.
    WrongFieldCount { found: usize },
    /// A numeric column could not be converted.
    InvalidNumber { column: PollColumn, raw: String },
}

impl Error for RowRejection {}

impl Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowRejection::WrongFieldCount { found } => write!(
                f,
                "expected {} fields, found {}",
                PollColumn::FIELD_COUNT,
                found
            ),
            RowRejection::InvalidNumber { column, raw } => {
                write!(f, "invalid number in column '{}': {:?}", column.name(), raw)
            }
        }
    }
}

// ******** Output data structures *********

/// Outcome of the highest polling query.
#[derive(PartialEq, Debug, Clone)]
pub enum HighestPolling {
    /// Neither candidate has any result.
    NoData,
    /// The highest value appears in the results of both candidates.
    Even(f64),
    /// Only one candidate reached the highest value.
    Leader { label: String, value: f64 },
}

impl HighestPolling {
    pub const NO_DATA_MESSAGE: &'static str = "No polling data available";
}

impl Display for HighestPolling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HighestPolling::NoData => write!(f, "{}", HighestPolling::NO_DATA_MESSAGE),
            HighestPolling::Even(value) => write!(f, "{:.1}% (EVEN)", value),
            HighestPolling::Leader { label, value } => write!(f, "{}: {:.1}%", label, value),
        }
    }
}

/// A value for each of the two candidates, in column order.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct CandidatePair {
    pub first: f64,
    pub second: f64,
}

impl CandidatePair {
    pub const ZERO: CandidatePair = CandidatePair {
        first: 0.0,
        second: 0.0,
    };
}

impl From<CandidatePair> for (f64, f64) {
    fn from(p: CandidatePair) -> (f64, f64) {
        (p.first, p.second)
    }
}

/// All the statistics computed over one table.
#[derive(PartialEq, Debug, Clone)]
pub struct PollSummary {
    pub rows: usize,
    pub rejected_rows: usize,
    pub highest_polling: HighestPolling,
    pub likely_voter_average: CandidatePair,
    pub polling_history_change: CandidatePair,
}

// ********* Configuration **********

/// The names attached to the two result columns.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateLabels {
    pub first: Cow<'static, str>,
    pub second: Cow<'static, str>,
}

/// The options that control the queries.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QueryRules {
    pub candidates: CandidateLabels,
    /// Sample type selected by the likely voter average. Matched exactly,
    /// after trimming the sample type of the row.
    pub likely_voters_label: Cow<'static, str>,
    /// Number of polls in each of the earliest and latest windows.
    pub history_window: usize,
}

impl QueryRules {
    pub const DEFAULT_RULES: QueryRules = QueryRules {
        candidates: CandidateLabels {
            first: Cow::Borrowed("Harris"),
            second: Cow::Borrowed("Trump"),
        },
        likely_voters_label: Cow::Borrowed("Likely Voters"),
        history_window: 30,
    };
}

impl Default for QueryRules {
    fn default() -> Self {
        QueryRules::DEFAULT_RULES
    }
}
