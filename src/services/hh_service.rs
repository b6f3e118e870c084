use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::dto::hh_dto::{HhEmployer, HhVacancy, HhVacancyPage};
use crate::error::{Error, Result};

/// Read-only client for the public hh.ru API.
#[derive(Clone)]
pub struct HhService {
    client: Client,
    base_url: String,
    user_agent: String,
    per_page: u32,
}

impl HhService {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        per_page: u32,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            per_page,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "hh.ru request failed");
            return Err(Error::Connection);
        }

        Ok(response.json::<T>().await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch_employer(&self, employer_id: i64) -> Result<HhEmployer> {
        let url = format!("{}/employers/{}", self.base_url, employer_id);
        info!("Fetching employer profile from: {}", url);
        self.get_json(&url, &[]).await
    }

    /// Returns the first page of an employer's vacancies only.
    #[instrument(skip(self))]
    pub async fn fetch_vacancies(&self, employer_id: i64) -> Result<Vec<HhVacancy>> {
        let url = format!("{}/vacancies", self.base_url);
        info!("Fetching vacancies from: {}", url);
        let page: HhVacancyPage = self
            .get_json(
                &url,
                &[
                    ("employer_id", employer_id.to_string()),
                    ("per_page", self.per_page.to_string()),
                ],
            )
            .await?;
        Ok(page.items)
    }
}
