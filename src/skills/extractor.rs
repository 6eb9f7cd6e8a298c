use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::models::posting::VacancyPosting;
use crate::skills::normalizer::{SkillToken, normalize_all};
use crate::skills::vocabulary::SkillVocabulary;

/// Aggregated demand for each skill over one query's postings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementProfile {
    counts: BTreeMap<SkillToken, u32>,
    total_postings: u32,
}

impl RequirementProfile {
    /// Number of postings that mention `skill`.
    pub fn count(&self, skill: &SkillToken) -> u32 {
        self.counts.get(skill).copied().unwrap_or(0)
    }

    pub fn total_postings(&self) -> u32 {
        self.total_postings
    }

    /// Share of postings that mention `skill`, or `None` without postings.
    pub fn weight(&self, skill: &SkillToken) -> Option<f64> {
        (self.total_postings > 0)
            .then(|| f64::from(self.count(skill)) / f64::from(self.total_postings))
    }

    pub fn skills(&self) -> impl Iterator<Item = (&SkillToken, u32)> {
        self.counts.iter().map(|(skill, count)| (skill, *count))
    }

    fn record(&mut self, skills: &BTreeSet<SkillToken>) {
        self.total_postings += 1;
        for skill in skills {
            *self.counts.entry(skill.clone()).or_default() += 1;
        }
    }
}

/// Deduplicated skills required by a single posting: its tags plus every
/// vocabulary term found in its text.
pub fn posting_skills(
    posting: &VacancyPosting,
    vocabulary: &SkillVocabulary,
) -> BTreeSet<SkillToken> {
    let mut skills: BTreeSet<SkillToken> = normalize_all(&posting.tags).collect();
    skills.extend(vocabulary.recognize(&posting.text));
    skills.extend(vocabulary.recognize(&posting.title));
    skills
}

/// Builds the requirement profile, counting each skill at most once per posting.
pub fn extract(postings: &[VacancyPosting], vocabulary: &SkillVocabulary) -> RequirementProfile {
    let mut profile = RequirementProfile::default();

    for posting in postings {
        let skills = posting_skills(posting, vocabulary);
        if skills.is_empty() {
            debug!("posting {} mentions no recognisable skills", posting.id);
        }
        profile.record(&skills);
    }

    debug!(
        "extracted {} distinct skills from {} postings",
        profile.counts.len(),
        profile.total_postings
    );
    profile
}

#[cfg(test)]
pub(crate) fn profile_from_counts(
    counts: &[(&str, u32)],
    total_postings: u32,
) -> RequirementProfile {
    use crate::skills::normalizer::normalize;

    RequirementProfile {
        counts: counts
            .iter()
            .map(|(skill, count)| (normalize(skill).unwrap(), *count))
            .collect(),
        total_postings,
    }
}
