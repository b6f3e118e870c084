use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the "all vacancies" listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VacancyListing {
    pub title: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
    pub url: String,
    pub employer_name: String,
}

/// Full vacancy row joined with the owning company name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VacancyDetails {
    pub vacancy_id: i64,
    pub employer_id: i64,
    pub title: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub employer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CompanyVacancyCount {
    pub company: String,
    pub vacancies_count: i64,
}
