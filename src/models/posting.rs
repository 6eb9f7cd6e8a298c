use serde::Serialize;

/// One job posting as handed over by a vacancy source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VacancyPosting {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    /// Plain-text body, already stripped of markup.
    pub text: String,
    /// Structured skill tags attached by the job site.
    pub tags: Vec<String>,
}

impl VacancyPosting {
    pub fn new(id: impl Into<String>, text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            url: None,
            text: text.into(),
            tags,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
