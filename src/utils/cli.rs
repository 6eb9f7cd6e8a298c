use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "skillmatch")]
#[command(about = "Match your skills against live job postings and get recommendations", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Job title to search for (e.g. "Data Analyst")
    #[arg(short, long, value_name = "TITLE")]
    pub role: Option<String>,

    /// Experience level
    #[arg(short, long, value_enum, value_name = "LEVEL")]
    pub level: Option<Level>,

    /// Your skills, repeatable or comma-separated
    #[arg(short, long = "skill", value_name = "SKILL", value_delimiter = ',')]
    pub skills: Vec<String>,

    /// Number of search result pages to fetch
    #[arg(long, value_name = "N")]
    pub pages: Option<u32>,

    /// Minimum share of postings a skill needs to count as required
    #[arg(long, value_name = "WEIGHT")]
    pub min_weight: Option<f64>,

    /// Score from which you are considered interview-ready
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum Level {
    Intern,
    Junior,
    Middle,
    Senior,
    Lead,
    Principal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Intern => "Intern",
            Level::Junior => "Junior",
            Level::Middle => "Middle",
            Level::Senior => "Senior",
            Level::Lead => "Lead",
            Level::Principal => "Principal",
        };
        f.write_str(name)
    }
}
