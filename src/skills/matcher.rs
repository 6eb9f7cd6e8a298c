use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::models::posting::VacancyPosting;
use crate::skills::extractor::{RequirementProfile, posting_skills};
use crate::skills::normalizer::{SkillToken, normalize_all};
use crate::skills::vocabulary::SkillVocabulary;

pub const DEFAULT_MIN_WEIGHT: f64 = 0.1;

/// Skills the user claims for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSkillSet(BTreeSet<SkillToken>);

impl UserSkillSet {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(normalize_all(labels).collect())
    }

    pub fn contains(&self, skill: &SkillToken) -> bool {
        self.0.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillToken> {
        self.0.iter()
    }
}

impl FromIterator<SkillToken> for UserSkillSet {
    fn from_iter<T: IntoIterator<Item = SkillToken>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A required skill together with the share of postings that ask for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSkill {
    pub skill: SkillToken,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    score: f64,
    matched: Vec<RankedSkill>,
    gaps: Vec<RankedSkill>,
}

impl MatchResult {
    /// Fraction of required skills the user already has, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Required skills the user has, heaviest first.
    pub fn matched(&self) -> &[RankedSkill] {
        &self.matched
    }

    /// Required skills the user lacks, heaviest first.
    pub fn gaps(&self) -> &[RankedSkill] {
        &self.gaps
    }
}

/// Scoring outcome. `NoData` means there were no postings to compare against
/// and is never folded into a numeric score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchOutcome {
    Scored(MatchResult),
    NoData,
}

impl MatchOutcome {
    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            MatchOutcome::Scored(result) => Some(result),
            MatchOutcome::NoData => None,
        }
    }
}

/// Compares the user's skills with every requirement whose posting share is
/// at least `min_weight`.
pub fn score(user: &UserSkillSet, profile: &RequirementProfile, min_weight: f64) -> MatchOutcome {
    if profile.total_postings() == 0 {
        debug!("no postings to score against");
        return MatchOutcome::NoData;
    }

    let (mut matched, mut gaps): (Vec<_>, Vec<_>) = profile
        .skills()
        .filter_map(|(skill, _)| {
            Some(RankedSkill {
                skill: skill.clone(),
                weight: profile.weight(skill)?,
            })
        })
        .filter(|ranked| ranked.weight >= min_weight)
        .partition(|ranked| user.contains(&ranked.skill));

    let candidates = matched.len() + gaps.len();
    let score = if candidates == 0 {
        1.0
    } else {
        matched.len() as f64 / candidates as f64
    };

    matched.sort_by(by_weight_desc);
    gaps.sort_by(by_weight_desc);

    debug!(
        "scored {:.3}: {} matched, {} gaps, {} candidates",
        score,
        matched.len(),
        gaps.len(),
        candidates
    );

    MatchOutcome::Scored(MatchResult {
        score,
        matched,
        gaps,
    })
}

fn by_weight_desc(a: &RankedSkill, b: &RankedSkill) -> std::cmp::Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.skill.cmp(&b.skill))
}

/// How well the user covers one individual posting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingMatch {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub precision: f64,
}

/// Per-posting precision, best first. Postings that list no skills at all
/// have nothing to measure and are left out.
pub fn rank_postings(
    user: &UserSkillSet,
    postings: &[VacancyPosting],
    vocabulary: &SkillVocabulary,
) -> Vec<PostingMatch> {
    let mut ranked: Vec<PostingMatch> = postings
        .iter()
        .filter_map(|posting| {
            let required = posting_skills(posting, vocabulary);
            if required.is_empty() {
                return None;
            }
            let covered = required.iter().filter(|s| user.contains(s)).count();

            Some(PostingMatch {
                id: posting.id.clone(),
                title: posting.title.clone(),
                url: posting.url.clone(),
                precision: covered as f64 / required.len() as f64,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.precision.total_cmp(&a.precision).then_with(|| a.id.cmp(&b.id)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::extractor::{extract, profile_from_counts};
    use crate::skills::normalizer::normalize;

    fn user(labels: &[&str]) -> UserSkillSet {
        UserSkillSet::from_labels(labels)
    }

    fn names(skills: &[RankedSkill]) -> Vec<&str> {
        skills.iter().map(|s| s.skill.as_str()).collect()
    }

    fn scenario_profile() -> RequirementProfile {
        let vocabulary = SkillVocabulary::new(["python", "sql", "excel"]).unwrap();
        let postings = vec![
            VacancyPosting::new("1", "", vec!["python".into(), "sql".into()]),
            VacancyPosting::new("2", "", vec!["python".into(), "excel".into()]),
        ];
        extract(&postings, &vocabulary)
    }

    #[test]
    fn test_partial_coverage_scores_fraction_of_requirements() {
        let outcome = score(&user(&["python"]), &scenario_profile(), DEFAULT_MIN_WEIGHT);
        let result = outcome.result().unwrap();

        assert!((result.score() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(names(result.matched()), vec!["python"]);
        assert_eq!(names(result.gaps()), vec!["excel", "sql"]);
        assert_eq!(result.gaps()[0].weight, 0.5);
        assert_eq!(result.matched()[0].weight, 1.0);
    }

    #[test]
    fn test_full_coverage_orders_matched_by_weight() {
        let outcome = score(
            &user(&["Python", "SQL", "Excel"]),
            &scenario_profile(),
            DEFAULT_MIN_WEIGHT,
        );
        let result = outcome.result().unwrap();

        assert_eq!(result.score(), 1.0);
        assert_eq!(names(result.matched()), vec!["python", "excel", "sql"]);
        assert!(result.gaps().is_empty());
    }

    #[test]
    fn test_no_postings_is_no_data() {
        let profile = RequirementProfile::default();

        assert_eq!(score(&user(&["python"]), &profile, 0.1), MatchOutcome::NoData);
        assert_eq!(score(&user(&[]), &profile, 0.0), MatchOutcome::NoData);
    }

    #[test]
    fn test_everything_below_min_weight_is_a_perfect_score() {
        let profile = profile_from_counts(&[("python", 1), ("sql", 1)], 20);
        let outcome = score(&user(&["excel"]), &profile, 0.1);
        let result = outcome.result().unwrap();

        assert_eq!(result.score(), 1.0);
        assert!(result.matched().is_empty());
        assert!(result.gaps().is_empty());
    }

    #[test]
    fn test_postings_without_skills_yield_a_perfect_score() {
        let profile = profile_from_counts(&[], 3);
        let outcome = score(&user(&["python"]), &profile, 0.1);

        assert_eq!(outcome.result().map(MatchResult::score), Some(1.0));
    }

    #[test]
    fn test_min_weight_filters_rare_skills() {
        let profile = profile_from_counts(&[("python", 10), ("sql", 5), ("cobol", 1)], 10);
        let result = score(&user(&["python"]), &profile, 0.2);
        let result = result.result().unwrap();

        assert_eq!(names(result.gaps()), vec!["sql"]);
        assert_eq!(result.score(), 0.5);
    }

    #[test]
    fn test_min_weight_boundary_is_inclusive() {
        let profile = profile_from_counts(&[("python", 1)], 10);
        let result = score(&user(&[]), &profile, 0.1);

        assert_eq!(names(result.result().unwrap().gaps()), vec!["python"]);
    }

    #[test]
    fn test_irrelevant_user_skills_do_not_change_score() {
        let profile = scenario_profile();
        let base = score(&user(&["python"]), &profile, 0.1);
        let padded = score(&user(&["python", "cobol", "fortran"]), &profile, 0.1);

        assert_eq!(
            base.result().unwrap().score(),
            padded.result().unwrap().score()
        );
    }

    #[test]
    fn test_covering_a_gap_never_lowers_the_score() {
        let profile = profile_from_counts(
            &[("python", 9), ("sql", 6), ("excel", 4), ("tableau", 2), ("git", 1)],
            10,
        );

        for min_weight in [0.0, 0.1, 0.3, 0.5] {
            let mut skills = UserSkillSet::default();
            let mut previous = score(&skills, &profile, min_weight).result().unwrap().score();

            loop {
                let outcome = score(&skills, &profile, min_weight);
                let Some(gap) = outcome.result().unwrap().gaps().first().cloned() else {
                    break;
                };
                skills = skills.iter().cloned().chain([gap.skill]).collect();
                let next = score(&skills, &profile, min_weight).result().unwrap().score();
                assert!(next > previous, "{next} <= {previous} at {min_weight}");
                previous = next;
            }

            assert_eq!(previous, 1.0);
        }
    }

    #[test]
    fn test_rank_postings_skips_postings_without_skills() {
        let vocabulary = SkillVocabulary::new(["python", "sql"]).unwrap();
        let postings = vec![
            VacancyPosting::new("a", "python and sql", vec![]).with_title("Analyst"),
            VacancyPosting::new("b", "just python", vec![]),
            VacancyPosting::new("c", "no skills", vec![]),
            VacancyPosting::new("d", "", vec!["Python".into()]),
        ];
        let ranked = rank_postings(&user(&["python"]), &postings, &vocabulary);

        let ids: Vec<_> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a"]);
        assert_eq!(ranked[2].precision, 0.5);
        assert_eq!(ranked[2].title, "Analyst");
    }

    #[test]
    fn test_user_skill_set_normalizes_labels() {
        let skills = user(&[" Python ", "PYTHON!", "", "sql"]);

        assert_eq!(skills.len(), 2);
        assert!(skills.contains(&normalize("python").unwrap()));
    }
}
