use serde::{Deserialize, Deserializer, Serialize};

/// hh.ru sends identifiers as JSON strings; older payloads and fixtures use numbers.
fn deserialize_id_flexible<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdOrString {
        Int(i64),
        String(String),
    }

    match IdOrString::deserialize(deserializer)? {
        IdOrString::Int(i) => Ok(i),
        IdOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid identifier: {}", s))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HhEmployer {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HhSalary {
    #[serde(default)]
    pub from: Option<i64>,
    #[serde(default)]
    pub to: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HhSnippet {
    #[serde(default)]
    pub requirement: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HhVacancy {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: i64,
    pub name: String,
    pub alternate_url: String,
    #[serde(default)]
    pub salary: Option<HhSalary>,
    #[serde(default)]
    pub snippet: Option<HhSnippet>,
}

/// One page of `GET /vacancies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HhVacancyPage {
    pub items: Vec<HhVacancy>,
}
