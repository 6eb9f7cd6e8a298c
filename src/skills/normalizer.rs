use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};

/// Canonical skill identifier.
///
/// Always lower-case, trimmed, free of surrounding punctuation and with
/// single spaces between words. The only way to obtain one is [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkillToken(String);

impl SkillToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SkillToken {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SkillToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SkillToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Turns a free-text skill label into a [`SkillToken`].
///
/// Returns `None` when nothing is left after cleaning, e.g. for `"  "` or `"!!"`.
/// Trailing `+` and `#` survive so that `c++` and `c#` keep their identity,
/// as does a leading dot directly in front of a word (`.net`).
pub fn normalize(raw: &str) -> Option<SkillToken> {
    let lowered = raw.to_lowercase();

    let start = lowered
        .char_indices()
        .find(|&(idx, c)| {
            c.is_alphanumeric()
                || (c == '.'
                    && lowered[idx + 1..]
                        .chars()
                        .next()
                        .is_some_and(char::is_alphanumeric))
        })
        .map(|(idx, _)| idx)?;

    let trimmed = lowered[start..].trim_end_matches(|c: char| !is_kept_trailing(c));

    let token = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if token.is_empty() {
        return None;
    }

    Some(SkillToken(token))
}

/// Normalizes every label and drops the ones that clean up to nothing.
pub fn normalize_all<I, S>(raw: I) -> impl Iterator<Item = SkillToken>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().filter_map(|s| normalize(s.as_ref()))
}

fn is_kept_trailing(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}
