use crate::polls::*;

/// The configuration file.
///
/// ```json
/// {
///   "input": "polling_data.csv",
///   "candidates": ["Harris", "Trump"],
///   "likelyVotersLabel": "Likely Voters",
///   "historyWindow": 30
/// }
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollConfig {
    pub input: Option<String>,
    pub candidates: Option<Vec<String>>,
    #[serde(rename = "likelyVotersLabel")]
    pub likely_voters_label: Option<String>,
    #[serde(rename = "historyWindow")]
    pub history_window: Option<usize>,
}

/// The description of the run, as written in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub input: String,
    pub candidates: Vec<String>,
    #[serde(rename = "likelyVotersLabel")]
    pub likely_voters_label: String,
    #[serde(rename = "historyWindow")]
    pub history_window: String,
}

pub fn read_config(path: &str) -> PollResult<PollConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    let config: PollConfig =
        serde_json::from_str(contents.as_str()).context(ParsingConfigSnafu { path })?;
    Ok(config)
}

pub fn read_summary(path: &str) -> PollResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingReferenceSnafu { path })?;
    Ok(js)
}
