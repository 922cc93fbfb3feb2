use clap::Parser;

/// Converts one contest of a plain-text election canvass report into a CSV
/// table with one row per precinct.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The text file containing the full canvass report.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// If passed as an argument, lists every contest found in the report
    /// along with the number to pass to --contest.
    #[clap(short, long, takes_value = false)]
    pub list: bool,

    /// If passed as an argument together with --list, the directory of
    /// contests is written to the standard output as JSON instead of plain
    /// text.
    #[clap(long, takes_value = false)]
    pub json: bool,

    /// The number of the contest to tabulate. Use --list to find it.
    #[clap(short, long, value_parser)]
    pub contest: Option<usize>,

    /// (file path or empty) If specified, the CSV table is written to the
    /// given location instead of the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
