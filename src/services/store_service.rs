use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dto::report_dto::{CompanyVacancyCount, VacancyDetails, VacancyListing};
use crate::error::{Error, Result};
use crate::models::employer::Employer;
use crate::models::vacancy::Vacancy;

const MIDPOINT_SQL: &str = "(COALESCE(v.salary_from, 0) + COALESCE(v.salary_to, 0)) / 2.0";

const DETAILS_COLUMNS: &str = "v.vacancy_id, v.employer_id, v.title, v.salary_from, v.salary_to, \
     v.currency, v.url, v.description, e.company AS employer_name";

/// Postgres-backed storage for employers and their vacancies. Every statement
/// runs in auto-commit mode.
#[derive(Clone)]
pub struct StoreService {
    pool: PgPool,
}

impl StoreService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employers (
                employer_id BIGINT PRIMARY KEY,
                company VARCHAR(255) NOT NULL,
                url VARCHAR(255),
                description TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vacancies (
                vacancy_id BIGINT PRIMARY KEY,
                employer_id BIGINT NOT NULL REFERENCES employers(employer_id) ON DELETE CASCADE,
                title VARCHAR(255) NOT NULL,
                salary_from BIGINT,
                salary_to BIGINT,
                currency VARCHAR(10),
                url VARCHAR(255) NOT NULL,
                description TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drops both tables and recreates them empty.
    pub async fn reset_schema(&self) -> Result<()> {
        info!("Resetting database schema");
        sqlx::query("DROP TABLE IF EXISTS vacancies CASCADE")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS employers CASCADE")
            .execute(&self.pool)
            .await?;
        self.create_tables().await
    }

    #[instrument(skip(self, employer), fields(employer_id = employer.employer_id))]
    pub async fn upsert_employer(&self, employer: &Employer) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employers (employer_id, company, description, url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (employer_id) DO UPDATE SET
                company = EXCLUDED.company,
                description = EXCLUDED.description,
                url = EXCLUDED.url
            RETURNING employer_id
            "#,
        )
        .bind(employer.employer_id)
        .bind(&employer.company)
        .bind(&employer.description)
        .bind(&employer.url)
        .fetch_optional(&self.pool)
        .await?;

        id.ok_or_else(|| {
            Error::NotFound(format!("Failed to upsert employer {}", employer.employer_id))
        })
    }

    #[instrument(skip(self, vacancy), fields(vacancy_id = vacancy.vacancy_id))]
    pub async fn upsert_vacancy(&self, employer_id: i64, vacancy: &Vacancy) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO vacancies
                (vacancy_id, employer_id, title, salary_from, salary_to, currency, url, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (vacancy_id) DO UPDATE SET
                employer_id = EXCLUDED.employer_id,
                title = EXCLUDED.title,
                salary_from = EXCLUDED.salary_from,
                salary_to = EXCLUDED.salary_to,
                currency = EXCLUDED.currency,
                url = EXCLUDED.url,
                description = EXCLUDED.description
            RETURNING vacancy_id
            "#,
        )
        .bind(vacancy.vacancy_id)
        .bind(employer_id)
        .bind(&vacancy.title)
        .bind(vacancy.salary_from)
        .bind(vacancy.salary_to)
        .bind(&vacancy.currency)
        .bind(&vacancy.url)
        .bind(&vacancy.description)
        .fetch_optional(&self.pool)
        .await?;

        id.ok_or_else(|| Error::NotFound(format!("Failed to upsert vacancy {}", vacancy.vacancy_id)))
    }

    pub async fn list_all_vacancies(&self) -> Result<Vec<VacancyListing>> {
        let items = sqlx::query_as::<_, VacancyListing>(
            r#"
            SELECT v.title, v.salary_from, v.salary_to, v.currency, v.url,
                   e.company AS employer_name
            FROM vacancies v
            JOIN employers e ON v.employer_id = e.employer_id
            ORDER BY e.company, v.vacancy_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn average_midpoint(&self) -> Result<Decimal> {
        let query = format!(
            "SELECT AVG({}) FROM vacancies v \
             WHERE v.salary_from IS NOT NULL OR v.salary_to IS NOT NULL",
            MIDPOINT_SQL
        );
        let avg = sqlx::query_scalar::<_, Option<Decimal>>(&query)
            .fetch_one(&self.pool)
            .await?;
        Ok(avg.unwrap_or(Decimal::ZERO))
    }

    /// Mean salary midpoint over vacancies with at least one bound, `0.0` when there are none.
    pub async fn average_salary(&self) -> Result<f64> {
        let avg = self.average_midpoint().await?;
        Ok(avg.to_f64().unwrap_or(0.0))
    }

    /// Vacancies whose midpoint is strictly above the average, highest first.
    ///
    /// The average and the filter are two separate statements, so a concurrent
    /// writer can move the average in between.
    pub async fn vacancies_above_average(&self) -> Result<Vec<VacancyDetails>> {
        let avg = self.average_midpoint().await?;
        let query = format!(
            "SELECT {columns} FROM vacancies v \
             JOIN employers e ON v.employer_id = e.employer_id \
             WHERE {midpoint} > $1 \
             ORDER BY {midpoint} DESC, v.vacancy_id",
            columns = DETAILS_COLUMNS,
            midpoint = MIDPOINT_SQL,
        );
        let items = sqlx::query_as::<_, VacancyDetails>(&query)
            .bind(avg)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Case-insensitive substring match on vacancy title or description.
    pub async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<VacancyDetails>> {
        let query = format!(
            "SELECT {} FROM vacancies v \
             JOIN employers e ON v.employer_id = e.employer_id \
             WHERE LOWER(v.title) LIKE $1 OR LOWER(v.description) LIKE $1 \
             ORDER BY v.vacancy_id",
            DETAILS_COLUMNS
        );
        let items = sqlx::query_as::<_, VacancyDetails>(&query)
            .bind(like_pattern(keyword))
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn company_vacancy_counts(&self) -> Result<Vec<CompanyVacancyCount>> {
        let items = sqlx::query_as::<_, CompanyVacancyCount>(
            r#"
            SELECT e.company, COUNT(v.vacancy_id) AS vacancies_count
            FROM employers e
            LEFT JOIN vacancies v ON e.employer_id = v.employer_id
            GROUP BY e.employer_id, e.company
            ORDER BY vacancies_count DESC, e.company
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Lower-cased `%keyword%` with LIKE wildcards in the keyword escaped.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
