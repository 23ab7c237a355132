use log::{debug, info, warn};

use poll_reader::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::polls::config_reader::*;

pub mod config_reader;

#[derive(Debug, Snafu)]
pub enum PollError {
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error opening reference summary {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference summary {path}"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("No input file: pass --input or set 'input' in the configuration"))]
    MissingInput {},
    #[snafu(display("Missing parent directory for configuration file {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type PollResult<T> = Result<T, PollError>;

fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

fn format_average(x: f64) -> String {
    format!("{:.2}", x)
}

fn format_change(x: f64) -> String {
    format!("{:+.2}", x)
}

fn validate_rules(config: &PollConfig, candidates: Option<Vec<String>>) -> PollResult<QueryRules> {
    let defaults = QueryRules::DEFAULT_RULES;
    let candidates = match candidates.or_else(|| config.candidates.clone()) {
        None => defaults.candidates,
        Some(names) => match names.as_slice() {
            [first, second] if !first.trim().is_empty() && !second.trim().is_empty() => {
                CandidateLabels {
                    first: first.trim().to_string().into(),
                    second: second.trim().to_string().into(),
                }
            }
            x => {
                whatever!(
                    "Expected two non-empty candidate labels, found {:?}",
                    x
                )
            }
        },
    };
    let likely_voters_label = match config.likely_voters_label.clone() {
        None => defaults.likely_voters_label,
        Some(s) if !s.trim().is_empty() => s.trim().to_string().into(),
        Some(s) => {
            whatever!("Cannot use likely voters label {:?}", s)
        }
    };
    let history_window = match config.history_window {
        None => defaults.history_window,
        Some(x) if x > 0 => x,
        Some(x) => {
            whatever!("History window must be positive, found {}", x)
        }
    };
    Ok(QueryRules {
        candidates,
        likely_voters_label,
        history_window,
    })
}

fn resolve_input(
    config_path: Option<&str>,
    config: &PollConfig,
    input: Option<String>,
) -> PollResult<String> {
    if let Some(p) = input {
        return Ok(p);
    }
    let config_input = config.input.clone().context(MissingInputSnafu {})?;
    match config_path {
        Some(cp) => {
            let root_p = Path::new(cp)
                .parent()
                .context(MissingParentDirSnafu { path: cp })?;
            let p: PathBuf = root_p.join(config_input);
            Ok(p.as_path().display().to_string())
        }
        None => Ok(config_input),
    }
}

fn pair_to_json(rules: &QueryRules, pair: CandidatePair, fmt: fn(f64) -> String) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    m.insert(rules.candidates.first.to_string(), json!(fmt(pair.first)));
    m.insert(rules.candidates.second.to_string(), json!(fmt(pair.second)));
    JSValue::Object(m)
}

fn build_summary_js(input: &str, rules: &QueryRules, summary: &PollSummary) -> JSValue {
    let c = OutputConfig {
        input: simplify_file_name(input),
        candidates: vec![
            rules.candidates.first.to_string(),
            rules.candidates.second.to_string(),
        ],
        likely_voters_label: rules.likely_voters_label.to_string(),
        history_window: rules.history_window.to_string(),
    };
    json!({
        "config": c,
        "results": {
            "rows": summary.rows.to_string(),
            "rejectedRows": summary.rejected_rows.to_string(),
            "highestPolling": summary.highest_polling.to_string(),
            "likelyVoterAverage": pair_to_json(rules, summary.likely_voter_average, format_average),
            "pollingHistoryChange": pair_to_json(rules, summary.polling_history_change, format_change),
        }
    })
}

fn print_report(rules: &QueryRules, summary: &PollSummary) {
    let (first, second) = (&rules.candidates.first, &rules.candidates.second);
    println!("Highest Polling Candidate: {}", summary.highest_polling);
    println!("Likely Voter Polling Average:");
    println!("  {}: {}", first, format_average(summary.likely_voter_average.first));
    println!("  {}: {}", second, format_average(summary.likely_voter_average.second));
    println!("Polling History Change:");
    println!("  {}: {}", first, format_change(summary.polling_history_change.first));
    println!("  {}: {}", second, format_change(summary.polling_history_change.second));
}

/// Reads the poll table, prints the statistics and returns the summary in JSON format.
///
/// The options passed directly take precedence over the ones from the configuration file.
pub fn run_summary(
    config_path: Option<String>,
    input: Option<String>,
    candidates: Option<Vec<String>>,
    out: Option<String>,
    check_summary_path: Option<String>,
) -> PollResult<JSValue> {
    let config: PollConfig = match config_path.as_deref() {
        Some(cp) => read_config(cp)?,
        None => PollConfig::default(),
    };
    info!("config: {:?}", config);

    // Validate the rules:
    let rules = validate_rules(&config, candidates)?;
    let input_path = resolve_input(config_path.as_deref(), &config, input)?;
    info!("Attempting to read poll file {:?}", input_path);

    let table = PollTable::from_path(&input_path);
    for (lineno, rejection) in table.rejected() {
        debug!("Line {} skipped: {}", lineno, rejection);
    }
    let summary = summarize(&table, &rules);
    info!("summary: {:?}", summary);

    print_report(&rules, &summary);

    // Assemble the final json
    let result_js = build_summary_js(&input_path, &rules, &summary);
    let pretty_js_stats =
        serde_json::to_string_pretty(&result_js).context(SerializingSummarySnafu {})?;

    match out.as_deref() {
        None | Some("") => {}
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) => {
            info!("Writing summary to {:?}", p);
            fs::write(p, &pretty_js_stats).context(WritingSummarySnafu { path: p })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        info!("reference summary: {:?}", summary_ref);
        if summary_ref != result_js {
            let pretty_js_summary_ref =
                serde_json::to_string_pretty(&summary_ref).context(SerializingSummarySnafu {})?;
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
    }

    Ok(result_js)
}
