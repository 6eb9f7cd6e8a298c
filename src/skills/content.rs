use std::collections::BTreeMap;

use eyre::Result;
use log::{debug, warn};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::skills::normalizer::{SkillToken, normalize};
use crate::utils::config::ContentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub url: String,
}

/// Read-only interview questions and courses keyed by skill.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    questions: BTreeMap<SkillToken, Vec<String>>,
    courses: BTreeMap<SkillToken, Vec<Course>>,
    course_search_url: Url,
}

impl ContentLibrary {
    pub fn new(content: &ContentConfig, course_search_url: &str) -> Result<Self> {
        let library = Self {
            questions: keyed_by_token(&content.questions),
            courses: keyed_by_token(&content.courses),
            course_search_url: Url::parse(course_search_url)?,
        };

        debug!(
            "content library holds questions for {} skills and courses for {} skills",
            library.questions.len(),
            library.courses.len()
        );
        Ok(library)
    }

    pub fn questions(&self, skill: &SkillToken) -> &[String] {
        self.questions.get(skill).map(Vec::as_slice).unwrap_or_default()
    }

    /// Curated courses for `skill`, falling back to a catalogue search.
    pub fn courses(&self, skill: &SkillToken) -> Vec<Course> {
        match self.courses.get(skill) {
            Some(curated) if !curated.is_empty() => curated.clone(),
            _ => vec![Course {
                title: format!("Search courses: {}", skill),
                url: self.search_url(skill),
            }],
        }
    }

    /// Catalogue search link for an arbitrary query, e.g. a role title.
    pub fn search_url(&self, query: &str) -> String {
        let mut url = self.course_search_url.clone();
        url.query_pairs_mut().append_pair("query", query);
        url.into()
    }
}

fn keyed_by_token<T: Clone>(raw: &BTreeMap<String, Vec<T>>) -> BTreeMap<SkillToken, Vec<T>> {
    let mut keyed: BTreeMap<SkillToken, Vec<T>> = BTreeMap::new();
    for (label, items) in raw {
        match normalize(label) {
            Some(token) => keyed.entry(token).or_default().extend(items.iter().cloned()),
            None => warn!("ignoring content entry with empty skill label {:?}", label),
        }
    }
    keyed
}
