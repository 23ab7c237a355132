use clap::Parser;

/// Summary statistics for a table of election polls.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the poll table and the options of the queries.
    /// A relative input path in this file is resolved against the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The poll table, in CSV format. Setting this option overrides the path that may be
    /// specified with the --config option. A missing file is treated as an empty table.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (two values or not specified) The labels of the two candidates, in the order of the result
    /// columns. Defaults to Harris and Trump.
    #[clap(long, value_parser)]
    pub candidates: Option<Vec<String>>,

    /// (file path, 'stdout' or empty) If specified, the summary of the polls will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, pollreader will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
