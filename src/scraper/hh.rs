use eyre::Result;
use log::{debug, info};
use reqwest::Url;

use crate::models::hh::{SearchPage, VacancyDetail};
use crate::models::posting::VacancyPosting;
use crate::scraper::http::HttpClient;
use crate::scraper::{VacancyQuery, VacancySource};
use crate::utils::config::FetchConfig;

/// Vacancy source backed by the public HeadHunter API.
pub struct HhScraper {
    http: HttpClient,
    fetch: FetchConfig,
}

impl HhScraper {
    pub fn new(fetch: FetchConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(&fetch)?,
            fetch,
        })
    }

    fn search_url(&self, text: &str, page: u32) -> Result<Url> {
        Ok(Url::parse_with_params(
            &self.fetch.endpoint,
            &[
                ("text", text.to_string()),
                ("area", self.fetch.area.to_string()),
                ("page", page.to_string()),
                ("per_page", self.fetch.per_page.to_string()),
            ],
        )?)
    }

    async fn vacancy_links(&self, query: &VacancyQuery) -> Result<Vec<Url>> {
        let text = query.search_text();
        let mut links = Vec::new();

        for page in 0..self.fetch.pages {
            let result: SearchPage = self.http.get_json(self.search_url(&text, page)?).await?;
            if result.items.is_empty() {
                break;
            }

            debug!("search page {} returned {} items", page, result.items.len());
            for item in result.items {
                match item.url {
                    Some(url) => links.push(Url::parse(&url)?),
                    None => debug!("search item {} has no API link", item.id),
                }
            }

            if let Some(total) = result.pages
                && page + 1 >= total
            {
                break;
            }
        }

        Ok(links)
    }
}

impl VacancySource for HhScraper {
    async fn fetch(&self, query: &VacancyQuery) -> Result<Vec<VacancyPosting>> {
        info!("searching vacancies for \"{}\"", query.search_text());

        let links = self.vacancy_links(query).await?;
        info!("fetching {} vacancy descriptions", links.len());

        let mut postings = Vec::with_capacity(links.len());
        for link in links {
            let detail: VacancyDetail = self.http.get_json(link).await?;
            postings.push(detail.into_posting());
        }

        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::scraper::http::test_server::TestServer;
    use crate::utils::cli::Level;

    fn local_scraper(server: &TestServer, pages: u32) -> HhScraper {
        let fetch = FetchConfig {
            endpoint: server.url("/vacancies").to_string(),
            pages,
            per_page: 2,
            timeout_secs: 5,
            max_retries: 0,
            ..FetchConfig::default()
        };
        HhScraper {
            http: HttpClient::local(&fetch).unwrap(),
            fetch,
        }
    }

    fn query() -> VacancyQuery {
        VacancyQuery {
            role: "Data Analyst".into(),
            level: None,
        }
    }

    fn search_requests(server: &TestServer) -> Vec<String> {
        server
            .requests()
            .into_iter()
            .filter(|target| target.starts_with("/vacancies?"))
            .collect()
    }

    fn item(base: &Url, id: &str) -> serde_json::Value {
        json!({ "id": id, "url": base.join(&format!("/vacancies/{id}")).unwrap().as_str() })
    }

    fn detail(id: &str) -> String {
        json!({
            "id": id,
            "name": format!("Analyst {id}"),
            "description": "<p>SQL and Python</p>",
            "key_skills": [{ "name": "SQL" }]
        })
        .to_string()
    }

    #[test]
    fn test_search_url_carries_query_parameters() {
        let scraper = HhScraper::new(FetchConfig::default()).unwrap();
        let query = VacancyQuery {
            role: "Data Analyst".into(),
            level: Some(Level::Middle),
        };
        let url = scraper.search_url(&query.search_text(), 1).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.hh.ru/vacancies?text=Data+Analyst+Middle&area=1&page=1&per_page=100"
        );
    }

    #[tokio::test]
    async fn test_search_stops_at_an_empty_page_and_skips_items_without_link() {
        let server = TestServer::start(|base, _, target| {
            let body = if target.contains("&page=0&") {
                json!({ "items": [item(base, "1"), { "id": "2" }], "pages": 5 })
            } else if target.contains("&page=1&") {
                json!({ "items": [], "pages": 5 })
            } else if target == "/vacancies/1" {
                return (200, detail("1"));
            } else {
                json!({ "items": [item(base, "3")], "pages": 5 })
            };
            (200, body.to_string())
        })
        .await;

        let postings = local_scraper(&server, 3).fetch(&query()).await.unwrap();

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].id, "1");
        assert_eq!(postings[0].title, "Analyst 1");
        assert_eq!(postings[0].tags, vec!["SQL"]);

        let searches = search_requests(&server);
        assert_eq!(searches.len(), 2);
        assert!(searches[0].contains("text=Data+Analyst"));
        assert!(!server.requests().iter().any(|t| t.contains("&page=2&")));
    }

    #[tokio::test]
    async fn test_search_stops_at_the_reported_page_count() {
        let server = TestServer::start(|base, _, _| {
            let body = json!({ "items": [item(base, "1"), item(base, "2")], "pages": 1 });
            (200, body.to_string())
        })
        .await;

        let links = local_scraper(&server, 3).vacancy_links(&query()).await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[1].path(), "/vacancies/2");
        assert_eq!(search_requests(&server).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_detail_fails_the_whole_fetch() {
        let server = TestServer::start(|base, _, target| {
            if target.starts_with("/vacancies?") {
                let body = json!({ "items": [item(base, "1"), item(base, "2")], "pages": 1 });
                (200, body.to_string())
            } else if target == "/vacancies/1" {
                (200, detail("1"))
            } else {
                (404, "{}".to_string())
            }
        })
        .await;

        let result = local_scraper(&server, 1).fetch(&query()).await;

        assert!(result.is_err());
        assert_eq!(server.requests().len(), 3);
    }
}
