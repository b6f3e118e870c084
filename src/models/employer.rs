use serde::{Deserialize, Serialize};

use crate::dto::hh_dto::HhEmployer;
use crate::utils::text::truncate_chars;

pub const DESCRIPTION_LIMIT: usize = 200;
pub const DESCRIPTION_SUFFIX: &str = "...";
pub const MISSING_DESCRIPTION: &str = "No description";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    pub employer_id: i64,
    pub company: String,
    pub description: String,
    pub url: String,
}

impl Employer {
    pub fn new(
        employer_id: i64,
        company: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            employer_id,
            company: company.into(),
            description: description.into(),
            url: url.into(),
        }
    }

    /// Builds the record from an hh.ru employer profile. The description is cut
    /// to its first 200 characters and always ends with `...`.
    pub fn from_api(raw: &HhEmployer) -> Self {
        let source = raw.description.as_deref().unwrap_or(MISSING_DESCRIPTION);
        let description = format!(
            "{}{}",
            truncate_chars(source, DESCRIPTION_LIMIT),
            DESCRIPTION_SUFFIX
        );

        Self {
            employer_id: raw.id,
            company: raw.name.clone(),
            description,
            url: raw.alternate_url.clone().unwrap_or_default(),
        }
    }
}
