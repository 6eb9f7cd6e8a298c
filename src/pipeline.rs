use std::error::Error as StdError;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;

use crate::scraper::{QuestionSource, VacancyQuery, VacancySource};
use crate::session::Session;
use crate::skills::content::ContentLibrary;
use crate::skills::extractor::extract;
use crate::skills::matcher::{MatchOutcome, PostingMatch, rank_postings, score};
use crate::skills::recommend::{Recommendation, recommend};
use crate::skills::vocabulary::SkillVocabulary;
use crate::utils::config::ConfigInner;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Nothing in the session normalizes to a skill.
    #[error("no usable skills entered; add at least one skill and try again")]
    InvalidUserInput,
    /// The vacancy source was unreachable, timed out or sent malformed data.
    #[error("couldn't retrieve postings, try again")]
    FetchFailure(#[source] Box<dyn StdError + Send + Sync>),
}

impl PipelineError {
    /// What the user can do about it.
    pub fn hint(&self) -> &'static str {
        match self {
            PipelineError::InvalidUserInput => "Add your skills with --skill or interactively.",
            PipelineError::FetchFailure(_) => "Check your connection or try again later.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub min_weight: f64,
    pub readiness_threshold: f64,
    pub max_skill_courses: usize,
    pub top_vacancies: usize,
    /// Upper bound on fetching one query's postings, retries included.
    pub fetch_timeout: Duration,
}

impl From<&ConfigInner> for PipelineSettings {
    fn from(config: &ConfigInner) -> Self {
        Self {
            min_weight: config.matching.min_weight,
            readiness_threshold: config.matching.readiness_threshold,
            max_skill_courses: config.recommendations.max_skill_courses,
            top_vacancies: config.recommendations.top_vacancies,
            fetch_timeout: Duration::from_secs(config.fetch.query_timeout_secs),
        }
    }
}

/// Everything one query produced, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub query: VacancyQuery,
    pub total_postings: u32,
    pub outcome: MatchOutcome,
    pub recommendation: Option<Recommendation>,
    /// Catalogue search for the whole role, offered when too many skills are missing.
    pub role_course: Option<String>,
    /// Per-posting precision, best first.
    pub distribution: Vec<f64>,
    pub top_vacancies: Vec<PostingMatch>,
    pub role_questions: Vec<String>,
}

/// fetch -> extract -> score -> recommend, run once per query.
pub struct Pipeline<'a, V, Q> {
    vacancies: &'a V,
    questions: Option<&'a Q>,
    vocabulary: &'a SkillVocabulary,
    content: &'a ContentLibrary,
    settings: PipelineSettings,
}

impl<'a, V, Q> Pipeline<'a, V, Q>
where
    V: VacancySource,
    Q: QuestionSource,
{
    pub fn new(
        vacancies: &'a V,
        questions: Option<&'a Q>,
        vocabulary: &'a SkillVocabulary,
        content: &'a ContentLibrary,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            vacancies,
            questions,
            vocabulary,
            content,
            settings,
        }
    }

    pub async fn run(&self, session: &Session) -> Result<Analysis, PipelineError> {
        let user = session.user_skills();
        if user.is_empty() {
            return Err(PipelineError::InvalidUserInput);
        }

        debug!(
            "user skills: {}",
            user.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        );

        let query = session.query();
        let fetch = timeout(self.settings.fetch_timeout, self.vacancies.fetch(&query));
        let postings = match fetch.await {
            Ok(Ok(postings)) => postings,
            Ok(Err(e)) => return Err(PipelineError::FetchFailure(e.into())),
            Err(elapsed) => {
                warn!(
                    "fetching postings took longer than {:?}",
                    self.settings.fetch_timeout
                );
                return Err(PipelineError::FetchFailure(Box::new(elapsed)));
            }
        };

        if postings.is_empty() {
            warn!("no postings found for \"{}\"", query.search_text());
        } else {
            info!("analysing {} postings", postings.len());
        }

        let profile = extract(&postings, self.vocabulary);
        let outcome = score(&user, &profile, self.settings.min_weight);
        let ranked = rank_postings(&user, &postings, self.vocabulary);

        let mut analysis = Analysis {
            query,
            total_postings: profile.total_postings(),
            outcome,
            recommendation: None,
            role_course: None,
            distribution: ranked.iter().map(|p| p.precision).collect(),
            top_vacancies: Vec::new(),
            role_questions: Vec::new(),
        };

        let Some(result) = analysis.outcome.result() else {
            return Ok(analysis);
        };

        info!("similarity score {:.2}", result.score());
        let recommendation = recommend(result, self.settings.readiness_threshold, self.content);

        match &recommendation {
            Recommendation::InterviewQuestions(_) => {
                analysis.top_vacancies = ranked
                    .into_iter()
                    .take(self.settings.top_vacancies)
                    .collect();
                analysis.role_questions = self.role_questions(session.role()).await;
            }
            Recommendation::Courses(gaps) => {
                if gaps.len() > self.settings.max_skill_courses {
                    analysis.role_course = Some(self.content.search_url(session.role().trim()));
                }
            }
        }

        analysis.recommendation = Some(recommendation);
        Ok(analysis)
    }

    async fn role_questions(&self, role: &str) -> Vec<String> {
        let Some(source) = self.questions else {
            return Vec::new();
        };

        match source.role_questions(role).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!("could not load interview questions for \"{}\": {}", role, e);
                Vec::new()
            }
        }
    }
}
