use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::chat::ranker::DEFAULT_TOP_N;

#[derive(Parser, Debug)]
#[command(name = "career-scout")]
#[command(about = "Get AI career advice from a CV and find matching jobs on LinkedIn and Bayt", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info, global = true)]
    pub verbosity: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest job titles and eight career advice points for a CV
    Advise {
        /// Plain-text CV
        #[arg(long, value_name = "FILE")]
        cv: PathBuf,
    },

    /// Search job listings for one or more titles
    Search {
        /// Job title to search for (repeatable)
        #[arg(short, long = "title", value_name = "TITLE", required = true)]
        titles: Vec<String>,

        /// Number of jobs per source (3-15)
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// linkedin, bayt, all, or any other domain
        #[arg(short, long, default_value = "all")]
        source: String,
    },

    /// Analyze a CV, search both sources and let the AI pick the best matches
    Match {
        /// Plain-text CV
        #[arg(long, value_name = "FILE")]
        cv: PathBuf,

        /// Job title to search for; defaults to the first suggested title
        #[arg(short, long, value_name = "TITLE")]
        title: Option<String>,

        /// Number of jobs per source (3-15)
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// How many jobs the AI should recommend
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Only keep jobs at this location (repeatable)
        #[arg(long = "location", value_name = "LOCATION")]
        locations: Vec<String>,

        /// Only keep jobs of this type, e.g. Full-time (repeatable)
        #[arg(long = "job-type", value_name = "TYPE")]
        job_types: Vec<String>,

        /// Only keep jobs from this source, e.g. LinkedIn (repeatable)
        #[arg(long = "source", value_name = "SOURCE")]
        sources: Vec<String>,
    },
}
