use log::debug;
use serde::Serialize;

use crate::skills::content::{ContentLibrary, Course};
use crate::skills::matcher::{MatchResult, RankedSkill};
use crate::skills::normalizer::SkillToken;

pub const DEFAULT_READINESS_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillQuestions {
    pub skill: SkillToken,
    pub weight: f64,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCourses {
    pub skill: SkillToken,
    pub weight: f64,
    pub courses: Vec<Course>,
}

/// What to show next, one entry per skill, most in-demand skill first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Recommendation {
    /// Reinforcement material for the skills the user already covers.
    InterviewQuestions(Vec<SkillQuestions>),
    /// Learning material for the skills the user is missing.
    Courses(Vec<SkillCourses>),
}

impl Recommendation {
    pub fn is_interview(&self) -> bool {
        matches!(self, Recommendation::InterviewQuestions(_))
    }
}

pub fn recommend(result: &MatchResult, threshold: f64, content: &ContentLibrary) -> Recommendation {
    if result.score() >= threshold {
        debug!(
            "score {:.3} reaches readiness threshold {:.3}",
            result.score(),
            threshold
        );
        return Recommendation::InterviewQuestions(
            result
                .matched()
                .iter()
                .map(|RankedSkill { skill, weight }| SkillQuestions {
                    skill: skill.clone(),
                    weight: *weight,
                    questions: content.questions(skill).to_vec(),
                })
                .collect(),
        );
    }

    // A score below the threshold always leaves at least one gap, since an
    // empty requirement set scores exactly 1.0.
    debug_assert!(!result.gaps().is_empty());

    Recommendation::Courses(
        result
            .gaps()
            .iter()
            .map(|RankedSkill { skill, weight }| SkillCourses {
                skill: skill.clone(),
                weight: *weight,
                courses: content.courses(skill),
            })
            .collect(),
    )
}
