use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use easy_config_store::ConfigStore;
use eyre::{Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::skills::content::Course;
use crate::skills::matcher::DEFAULT_MIN_WEIGHT;
use crate::skills::recommend::DEFAULT_READINESS_THRESHOLD;
use crate::utils::cli::Args;

pub type Config = Arc<ConfigInner>;

pub fn config(path: PathBuf) -> Result<Config> {
    let config_store = ConfigStore::<ConfigInner>::read(path, "config".to_string())?;
    let inner = (*config_store).clone();
    inner.validate()?;

    info!("config parsing successful");
    debug!("loaded configuration:\n{}", toml::to_string_pretty(&inner)?);

    Ok(Arc::new(inner))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConfigInner {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,
    #[serde(default = "default_readiness_threshold")]
    pub readiness_threshold: f64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_area")]
    pub area: u32,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct InterviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interview_source")]
    pub source_url: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RecommendationConfig {
    #[serde(default = "default_course_search_url")]
    pub course_search_url: String,
    #[serde(default = "default_max_skill_courses")]
    pub max_skill_courses: usize,
    #[serde(default = "default_top_vacancies")]
    pub top_vacancies: usize,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Static recommendation content keyed by free-text skill label.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default)]
    pub questions: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub courses: BTreeMap<String, Vec<Course>>,
}

fn default_min_weight() -> f64 {
    DEFAULT_MIN_WEIGHT
}

fn default_readiness_threshold() -> f64 {
    DEFAULT_READINESS_THRESHOLD
}

fn default_endpoint() -> String {
    "https://api.hh.ru/vacancies".to_string()
}

fn default_area() -> u32 {
    1
}

fn default_pages() -> u32 {
    1
}

fn default_per_page() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_query_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> usize {
    2
}

fn default_user_agent() -> String {
    format!("skillmatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

fn default_interview_source() -> String {
    "https://easyoffer.ru".to_string()
}

fn default_course_search_url() -> String {
    "https://www.coursera.org/search".to_string()
}

fn default_max_skill_courses() -> usize {
    3
}

fn default_top_vacancies() -> usize {
    3
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_weight: default_min_weight(),
            readiness_threshold: default_readiness_threshold(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            area: default_area(),
            pages: default_pages(),
            per_page: default_per_page(),
            timeout_secs: default_timeout_secs(),
            query_timeout_secs: default_query_timeout_secs(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            source_url: default_interview_source(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            course_search_url: default_course_search_url(),
            max_skill_courses: default_max_skill_courses(),
            top_vacancies: default_top_vacancies(),
        }
    }
}

impl Default for ConfigInner {
    fn default() -> Self {
        let cfg = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.default.toml",));

        toml::from_str(cfg).expect("embedded config.default.toml must parse")
    }
}

impl ConfigInner {
    pub fn validate(&self) -> Result<()> {
        let MatchingConfig {
            min_weight,
            readiness_threshold,
        } = self.matching;

        if !(0.0..=1.0).contains(&min_weight) {
            bail!("matching.min_weight must be within [0, 1], got {}", min_weight);
        }
        if !(0.0..=1.0).contains(&readiness_threshold) {
            bail!(
                "matching.readiness_threshold must be within [0, 1], got {}",
                readiness_threshold
            );
        }
        if self.fetch.pages == 0 || self.fetch.per_page == 0 {
            bail!("fetch.pages and fetch.per_page must be positive");
        }
        if self.fetch.timeout_secs == 0 || self.fetch.query_timeout_secs == 0 {
            bail!("fetch.timeout_secs and fetch.query_timeout_secs must be positive");
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(mut self, args: &Args) -> Result<Self> {
        if let Some(min_weight) = args.min_weight {
            self.matching.min_weight = min_weight;
        }
        if let Some(threshold) = args.threshold {
            self.matching.readiness_threshold = threshold;
        }
        if let Some(pages) = args.pages {
            self.fetch.pages = pages;
        }

        self.validate()?;
        Ok(self)
    }
}
