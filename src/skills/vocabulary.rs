use std::collections::BTreeSet;

use eyre::Result;
use log::debug;
use regex::Regex;

use crate::skills::normalizer::{SkillToken, normalize_all};

/// Fixed list of skills that are recognised inside free-text posting bodies.
pub struct SkillVocabulary {
    terms: Vec<(SkillToken, Regex)>,
}

impl SkillVocabulary {
    pub fn new<I, S>(skills: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<SkillToken> = normalize_all(skills).collect();

        let terms = unique
            .into_iter()
            .map(|token| {
                let pattern = term_pattern(&token);
                Ok((token, Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("skill vocabulary compiled with {} terms", terms.len());
        Ok(Self { terms })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every vocabulary skill mentioned at least once in `text`.
    pub fn recognize(&self, text: &str) -> BTreeSet<SkillToken> {
        let lowered = text.to_lowercase();
        self.terms
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&lowered))
            .map(|(token, _)| token.clone())
            .collect()
    }
}

// A term must not be glued to letters, digits, `+` or `#` on either side, so
// that "c" does not fire inside "c++" or "react" inside "reactive".
fn term_pattern(token: &SkillToken) -> String {
    let body = regex::escape(token.as_str()).replace(' ', r"\s+");
    format!(r"(?:^|[^\p{{L}}\p{{N}}+#]){body}(?:$|[^\p{{L}}\p{{N}}+#])")
}
