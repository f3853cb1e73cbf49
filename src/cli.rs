//! Command-line arguments for the `comp220` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use comp220::{constants::*, sorting::SortAlgorithm};

/// Data structure exercises: graph searches, an RPN calculator, a queue simulation,
/// course-schedule reports and interactive array and hashtable shells.
#[derive(Parser, Debug)]
#[command(name = "comp220")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides this.
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every city reachable from a start city
    Traverse {
        #[arg(long, value_enum, default_value = "bfs")]
        order: TraversalOrder,

        #[command(flatten)]
        cities: CitiesArgs,

        /// Start city. Prompts on stdin when omitted.
        #[arg(long)]
        start: Option<String>,
    },

    /// Find a route between two cities
    Route {
        #[arg(long, value_enum, default_value = "cheapest")]
        mode: RouteMode,

        #[command(flatten)]
        cities: CitiesArgs,

        /// Source city. Prompts on stdin when omitted.
        #[arg(long)]
        from: Option<String>,

        /// Destination city. Prompts on stdin when omitted.
        #[arg(long)]
        to: Option<String>,

        /// Print the adjacency matrix before searching
        #[arg(long)]
        matrix: bool,
    },

    /// Reverse Polish notation calculator reading from stdin
    Rpn,

    /// Run the server queue simulation
    Simulate {
        /// Simulation setup file
        #[arg(env = "COMP220_SIMULATION", default_value = DEFAULT_SIMULATION_PATH)]
        config: PathBuf,

        /// Write a default setup file and exit
        #[arg(long)]
        setup: bool,

        /// Seed the RNG for a repeatable run
        #[arg(long)]
        seed: Option<u64>,

        /// Print the status board and wait for ENTER after every minute
        #[arg(long)]
        interactive: bool,
    },

    /// Reports over a course schedule file
    Schedule {
        #[arg(value_enum)]
        report: ScheduleReport,

        /// Course to look up with `search`. Prompts on stdin when omitted.
        #[arg(long, short)]
        query: Option<String>,

        #[arg(long, env = "COMP220_SCHEDULE", default_value = DEFAULT_SCHEDULE_PATH)]
        path: PathBuf,
    },

    /// Time a sort over doubling input sizes
    SortBench(SortBenchArgs),

    /// Store index/value pairs in a sortable array, then look them up
    Array,

    /// Interactive shell over a string-to-string hashtable
    Hashtable,
}

#[derive(Args, Debug, Clone)]
pub struct CitiesArgs {
    /// Road network file
    #[arg(long = "cities", env = "COMP220_CITIES", default_value = DEFAULT_CITIES_PATH)]
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SortBenchArgs {
    #[arg(long, default_value_t = 64)]
    pub start: usize,

    #[arg(long, default_value_t = 10)]
    pub rounds: usize,

    #[arg(long, value_enum, default_value = "bubble")]
    pub algorithm: SortChoice,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    Bfs,
    Dfs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    /// Fewest roads
    Shortest,
    /// Fewest miles
    Cheapest,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleReport {
    /// Sections per subject
    Subjects,
    /// Sections per course, grouped by subject
    Courses,
    /// Section numbers shared by different courses in one term
    Conflicts,
    /// When a course was last offered
    Search,
    /// Accepted and rejected line counts
    Stats,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortChoice {
    Bubble,
    Quick,
}

impl From<SortChoice> for SortAlgorithm {
    fn from(choice: SortChoice) -> Self {
        match choice {
            SortChoice::Bubble => SortAlgorithm::Bubble,
            SortChoice::Quick => SortAlgorithm::Quick,
        }
    }
}

impl Cli {
    /// The env_logger filter used when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
