use crate::scraper::VacancyQuery;
use crate::skills::matcher::UserSkillSet;
use crate::skills::normalizer::normalize;
use crate::utils::cli::Level;

/// State of one user's session: the role they target and the skills they
/// have entered so far. Passed explicitly into every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: String,
    level: Option<Level>,
    skills: Vec<String>,
}

impl Session {
    pub fn new(role: impl Into<String>, level: Option<Level>) -> Self {
        Self {
            role: role.into(),
            level,
            skills: Vec::new(),
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Skills as the user typed them, in entry order.
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Adds a skill unless it is blank or already present in some spelling.
    pub fn add_skill(&mut self, raw: &str) -> bool {
        let Some(token) = normalize(raw) else {
            return false;
        };
        if self.skills.iter().any(|s| normalize(s).as_ref() == Some(&token)) {
            return false;
        }

        self.skills.push(raw.trim().to_string());
        true
    }

    pub fn clear_skills(&mut self) {
        self.skills.clear();
    }

    pub fn user_skills(&self) -> UserSkillSet {
        UserSkillSet::from_labels(&self.skills)
    }

    pub fn query(&self) -> VacancyQuery {
        VacancyQuery {
            role: self.role.clone(),
            level: self.level,
        }
    }
}
