use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::dto::hh_dto::HhVacancy;

/// A job posting as stored in the `vacancies` table. Missing salary bounds are
/// recorded as `0` and a missing currency as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub vacancy_id: i64,
    pub title: String,
    pub url: String,
    pub salary_from: i64,
    pub salary_to: i64,
    pub currency: String,
    pub description: String,
}

impl Vacancy {
    pub fn new(
        vacancy_id: i64,
        title: impl Into<String>,
        url: impl Into<String>,
        salary_from: Option<i64>,
        salary_to: Option<i64>,
        currency: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            vacancy_id,
            title: title.into(),
            url: url.into(),
            salary_from: salary_from.unwrap_or(0),
            salary_to: salary_to.unwrap_or(0),
            currency: currency.unwrap_or_default(),
            description: description.into(),
        }
    }

    pub fn from_api(raw: &HhVacancy) -> Self {
        let salary = raw.salary.clone().unwrap_or_default();
        let requirement = raw
            .snippet
            .as_ref()
            .and_then(|snippet| snippet.requirement.clone())
            .unwrap_or_default();

        Self::new(
            raw.id,
            raw.name.clone(),
            raw.alternate_url.clone(),
            salary.from,
            salary.to,
            salary.currency,
            requirement,
        )
    }

    pub fn from_api_list(items: &[HhVacancy]) -> Vec<Self> {
        items.iter().map(Self::from_api).collect()
    }

    fn salary_sum(&self) -> i128 {
        i128::from(self.salary_from) + i128::from(self.salary_to)
    }

    pub fn midpoint(&self) -> f64 {
        self.salary_sum() as f64 / 2.0
    }

    /// Total order by salary midpoint, ascending. Ties compare `Equal`, so
    /// `sort_by(Vacancy::cmp_by_midpoint)` keeps tied vacancies in input order.
    pub fn cmp_by_midpoint(&self, other: &Self) -> Ordering {
        self.salary_sum().cmp(&other.salary_sum())
    }
}

// `<` and `>` follow the midpoint. Distinct vacancies sharing a midpoint are
// neither less nor greater; use `cmp_by_midpoint` to sort.
impl PartialOrd for Vacancy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.cmp_by_midpoint(other) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vacancy(id: i64, from: Option<i64>, to: Option<i64>) -> Vacancy {
        Vacancy::new(id, "Job", "", from, to, Some("RUR".to_string()), "")
    }

    #[test]
    fn missing_salary_defaults_to_zero() {
        let v = Vacancy::new(2, "No Salary", "https://test.com", None, None, None, "No salary");
        assert_eq!(v.salary_from, 0);
        assert_eq!(v.salary_to, 0);
        assert_eq!(v.currency, "");
        assert_eq!(v.midpoint(), 0.0);
    }

    #[test]
    fn orders_by_salary_midpoint() {
        let low = vacancy(1, Some(50_000), Some(60_000));
        let high = vacancy(2, Some(100_000), Some(120_000));
        assert!(low < high);
        assert!(high > low);

        let one_sided = vacancy(3, None, Some(90_000));
        assert!(one_sided < low);
    }

    #[test]
    fn equal_midpoints_are_not_strictly_ordered() {
        let a = vacancy(1, Some(100), Some(200));
        let b = vacancy(2, Some(150), Some(150));
        assert!(!(a < b));
        assert!(!(b < a));
        assert_eq!(a.partial_cmp(&b), None);
        assert_eq!(a.partial_cmp(&a.clone()), Some(Ordering::Equal));
    }

    #[test]
    fn sorts_with_tied_midpoints() {
        let mut list = vec![
            vacancy(1, Some(300), Some(300)),
            vacancy(2, Some(100), Some(200)),
            vacancy(3, None, None),
            vacancy(4, Some(150), Some(150)),
            vacancy(5, Some(50), None),
        ];
        list.sort_by(Vacancy::cmp_by_midpoint);

        let ids: Vec<i64> = list.iter().map(|v| v.vacancy_id).collect();
        assert_eq!(ids, vec![3, 5, 2, 4, 1]);
        assert_eq!(list[2].cmp_by_midpoint(&list[3]), Ordering::Equal);
        assert!(list.windows(2).all(|w| w[0].midpoint() <= w[1].midpoint()));
    }

    #[test]
    fn less_than_matches_midpoint_comparison() {
        let list = [
            vacancy(1, Some(100), Some(200)),
            vacancy(2, Some(150), Some(150)),
            vacancy(3, Some(0), Some(10)),
            vacancy(4, None, Some(400)),
        ];
        for a in &list {
            for b in &list {
                assert_eq!(a < b, a.midpoint() < b.midpoint());
                assert_eq!(a > b, a.midpoint() > b.midpoint());
            }
        }
    }

    #[test]
    fn extreme_salaries_do_not_overflow() {
        let huge = vacancy(1, Some(i64::MAX), Some(i64::MAX));
        let small = vacancy(2, Some(1), Some(1));
        assert!(huge.midpoint() > 9.0e18);
        assert_eq!(small.cmp_by_midpoint(&huge), Ordering::Less);
        assert!(small < huge);
    }

    #[test]
    fn builds_list_from_api_items() {
        let items: Vec<HhVacancy> = serde_json::from_value(json!([
            {
                "id": 123,
                "name": "API Job",
                "alternate_url": "https://hh.ru/vacancy/123",
                "salary": { "from": 80000, "to": 120000, "currency": "RUR" },
                "snippet": { "requirement": "API skills" }
            },
            {
                "id": "124",
                "name": "Intern",
                "alternate_url": "https://hh.ru/vacancy/124",
                "salary": { "to": 30000 }
            },
            {
                "id": "125",
                "name": "Volunteer",
                "alternate_url": "https://hh.ru/vacancy/125",
                "salary": null,
                "snippet": {}
            }
        ]))
        .unwrap();

        let vacancies = Vacancy::from_api_list(&items);
        assert_eq!(vacancies.len(), 3);

        assert_eq!(vacancies[0].vacancy_id, 123);
        assert_eq!(vacancies[0].title, "API Job");
        assert_eq!(vacancies[0].salary_from, 80000);
        assert_eq!(vacancies[0].salary_to, 120000);
        assert_eq!(vacancies[0].currency, "RUR");
        assert_eq!(vacancies[0].description, "API skills");

        assert_eq!(vacancies[1].salary_from, 0);
        assert_eq!(vacancies[1].salary_to, 30000);
        assert_eq!(vacancies[1].currency, "");
        assert_eq!(vacancies[1].description, "");

        assert_eq!(vacancies[2].salary_from, 0);
        assert_eq!(vacancies[2].salary_to, 0);
        assert_eq!(vacancies[2].url, "https://hh.ru/vacancy/125");
    }
}
