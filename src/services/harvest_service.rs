use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::config::EmployerTarget;
use crate::error::Result;
use crate::models::employer::Employer;
use crate::models::vacancy::Vacancy;
use crate::services::hh_service::HhService;
use crate::services::store_service::StoreService;

/// Rows written during a harvest. An employer that fails partway is listed in
/// `skipped`, while its rows already written still count toward the totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub employers: usize,
    pub vacancies: usize,
    pub skipped: Vec<String>,
}

/// Pulls each configured employer and its vacancies from hh.ru into the store.
pub struct HarvestService {
    hh: HhService,
    store: StoreService,
    delay: Duration,
}

impl HarvestService {
    pub fn new(hh: HhService, store: StoreService, delay: Duration) -> Self {
        Self { hh, store, delay }
    }

    /// Processes employers one at a time. A failure skips that employer only;
    /// rows already written for it are kept.
    pub async fn run(&self, targets: &[EmployerTarget]) -> HarvestReport {
        let mut report = HarvestReport::default();

        for (idx, target) in targets.iter().enumerate() {
            info!("Processing employer: {} (ID: {})", target.name, target.id);

            if let Err(e) = self.harvest_employer(target, &mut report).await {
                warn!(error = %e, "Failed to process employer {}", target.name);
                report.skipped.push(target.name.clone());
            }

            // hh.ru rate limit
            if idx + 1 < targets.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            employers = report.employers,
            vacancies = report.vacancies,
            skipped = report.skipped.len(),
            "Harvest finished"
        );
        report
    }

    #[instrument(skip(self, target, report), fields(employer = %target.name))]
    async fn harvest_employer(
        &self,
        target: &EmployerTarget,
        report: &mut HarvestReport,
    ) -> Result<()> {
        let raw_employer = self.hh.fetch_employer(target.id).await?;
        let employer = Employer::from_api(&raw_employer);
        let employer_id = self.store.upsert_employer(&employer).await?;
        report.employers += 1;

        let raw_vacancies = self.hh.fetch_vacancies(target.id).await?;
        let vacancies = Vacancy::from_api_list(&raw_vacancies);
        for vacancy in &vacancies {
            self.store.upsert_vacancy(employer_id, vacancy).await?;
            report.vacancies += 1;
        }

        info!("Stored {} vacancies for {}", vacancies.len(), employer.company);
        Ok(())
    }
}
