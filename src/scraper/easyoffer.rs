use eyre::{Result, eyre};
use log::{debug, info};
use reqwest::Url;
use scraper::{Html, Selector};

use crate::scraper::QuestionSource;
use crate::scraper::http::HttpClient;
use crate::utils::config::FetchConfig;

/// Scrapes the interview question bank for a whole role from easyoffer.
pub struct EasyOfferScraper {
    http: HttpClient,
    source_url: Url,
}

impl EasyOfferScraper {
    pub fn new(fetch: &FetchConfig, source_url: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(fetch)?,
            source_url: Url::parse(source_url)?,
        })
    }
}

impl QuestionSource for EasyOfferScraper {
    async fn role_questions(&self, role: &str) -> Result<Vec<String>> {
        let index = self.http.get_text(self.source_url.clone()).await?;
        let Some(link) = find_role_link(&index, role, &self.source_url)? else {
            info!("no question bank found for role \"{}\"", role);
            return Ok(Vec::new());
        };

        debug!("question bank for \"{}\" at {}", role, link);
        let page = self.http.get_text(link).await?;
        parse_questions(&page)
    }
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| eyre!("invalid selector {:?}: {}", css, e))
}

/// Finds the first role card whose title contains `role`, case-insensitively.
fn find_role_link(html: &str, role: &str, base: &Url) -> Result<Option<Url>> {
    let needle = role.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(None);
    }

    let document = Html::parse_document(html);
    let card_links = selector("h5.card-title a")?;

    for link in document.select(&card_links) {
        let title = link.text().collect::<String>().to_lowercase();
        if title.contains(&needle)
            && let Some(href) = link.value().attr("href")
        {
            return Ok(Some(base.join(href)?));
        }
    }

    Ok(None)
}

/// First cell of every body row in the question table.
fn parse_questions(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let rows = selector("tbody tr")?;
    let first_cell = selector("td")?;

    Ok(document
        .select(&rows)
        .filter_map(|row| row.select(&first_cell).next())
        .map(|cell| cell.text().collect::<String>())
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect())
}
