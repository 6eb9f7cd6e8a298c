use eyre::Result;
use serde::Serialize;

use crate::models::posting::VacancyPosting;
use crate::utils::cli::Level;

pub mod easyoffer;
pub mod hh;
pub mod http;

/// What to search for: a role and an optional seniority level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VacancyQuery {
    pub role: String,
    pub level: Option<Level>,
}

impl VacancyQuery {
    pub fn search_text(&self) -> String {
        match self.level {
            Some(level) => format!("{} {}", self.role.trim(), level),
            None => self.role.trim().to_string(),
        }
    }
}

/// Anything that can turn a query into job postings.
pub trait VacancySource {
    async fn fetch(&self, query: &VacancyQuery) -> Result<Vec<VacancyPosting>>;
}

/// Role-level interview questions, independent of individual skills.
pub trait QuestionSource {
    async fn role_questions(&self, role: &str) -> Result<Vec<String>>;
}
