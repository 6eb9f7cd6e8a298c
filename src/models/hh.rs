use scraper::Html;
use serde::Deserialize;

use crate::models::posting::VacancyPosting;

/// One page of `GET /vacancies` search results.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    #[serde(default)]
    pub pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: String,
    /// API link to the full vacancy.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeySkill {
    pub name: String,
}

/// Full vacancy as returned by `GET /vacancies/{id}`.
#[derive(Debug, Deserialize)]
pub struct VacancyDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub alternate_url: Option<String>,
    /// HTML body.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_skills: Vec<KeySkill>,
}

impl VacancyDetail {
    pub fn into_posting(self) -> VacancyPosting {
        let text = html_to_text(&self.description);
        let tags = self.key_skills.into_iter().map(|skill| skill.name).collect();

        let posting = VacancyPosting::new(self.id, text, tags).with_title(self.name);
        match self.alternate_url {
            Some(url) => posting.with_url(url),
            None => posting,
        }
    }
}

pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"{
        "id": "101",
        "name": "Junior Data Analyst",
        "alternate_url": "https://hh.ru/vacancy/101",
        "description": "<p><strong>Requirements:</strong></p><ul><li>SQL</li><li>Python&nbsp;3</li></ul>",
        "key_skills": [{"name": "SQL"}, {"name": "Power BI"}],
        "salary": null
    }"#;

    #[test]
    fn test_detail_becomes_posting() {
        let detail: VacancyDetail = serde_json::from_str(DETAIL).unwrap();
        let posting = detail.into_posting();

        assert_eq!(posting.id, "101");
        assert_eq!(posting.title, "Junior Data Analyst");
        assert_eq!(posting.url.as_deref(), Some("https://hh.ru/vacancy/101"));
        assert_eq!(posting.tags, vec!["SQL", "Power BI"]);
        assert_eq!(posting.text, "Requirements: SQL Python 3");
    }

    #[test]
    fn test_missing_optional_fields() {
        let detail: VacancyDetail = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        let posting = detail.into_posting();

        assert!(posting.tags.is_empty());
        assert!(posting.text.is_empty());
        assert_eq!(posting.url, None);
    }

    #[test]
    fn test_search_page_without_items() {
        let page: SearchPage = serde_json::from_str(r#"{"found": 0, "pages": 0}"#).unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.pages, Some(0));
    }

    #[test]
    fn test_search_item_keeps_id_and_link_only() {
        let raw = r#"{"items": [
            {"id": "1", "name": "Analyst", "url": "https://api.hh.ru/vacancies/1"},
            {"id": "2", "name": "Archived"}
        ], "pages": 1}"#;
        let page: SearchPage = serde_json::from_str(raw).unwrap();

        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[0].url.as_deref(), Some("https://api.hh.ru/vacancies/1"));
        assert_eq!(page.items[1].url, None);
    }
}
