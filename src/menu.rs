use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::dto::report_dto::{CompanyVacancyCount, VacancyDetails, VacancyListing};
use crate::error::Result;
use crate::services::store_service::StoreService;

/// Read queries the interactive menu runs against the store.
#[allow(async_fn_in_trait)]
pub trait VacancyQueries {
    async fn list_all_vacancies(&self) -> Result<Vec<VacancyListing>>;
    async fn vacancies_above_average(&self) -> Result<Vec<VacancyDetails>>;
    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<VacancyDetails>>;
    async fn company_vacancy_counts(&self) -> Result<Vec<CompanyVacancyCount>>;
    async fn average_salary(&self) -> Result<f64>;
}

impl VacancyQueries for StoreService {
    async fn list_all_vacancies(&self) -> Result<Vec<VacancyListing>> {
        StoreService::list_all_vacancies(self).await
    }

    async fn vacancies_above_average(&self) -> Result<Vec<VacancyDetails>> {
        StoreService::vacancies_above_average(self).await
    }

    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<VacancyDetails>> {
        StoreService::search_by_keyword(self, keyword).await
    }

    async fn company_vacancy_counts(&self) -> Result<Vec<CompanyVacancyCount>> {
        StoreService::company_vacancy_counts(self).await
    }

    async fn average_salary(&self) -> Result<f64> {
        StoreService::average_salary(self).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AllVacancies,
    AboveAverage,
    Search,
    CompanyCounts,
    AverageSalary,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::AllVacancies),
            "2" => Ok(Self::AboveAverage),
            "3" => Ok(Self::Search),
            "4" => Ok(Self::CompanyCounts),
            "5" => Ok(Self::AverageSalary),
            "0" => Ok(Self::Exit),
            _ => Err(()),
        }
    }
}

const MENU_TEXT: &str = "\nChoose an action:\n\
1 - Show all vacancies\n\
2 - Show vacancies with above-average salary\n\
3 - Search vacancies by keyword\n\
4 - Show vacancy count per company\n\
5 - Show average salary across all vacancies\n\
0 - Exit\n";

fn display_opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn format_listing(v: &VacancyListing) -> String {
    format!(
        "Company: {} | Vacancy: {} | Salary: {} - {} {} | Link: {}",
        v.employer_name,
        v.title,
        display_opt(&v.salary_from),
        display_opt(&v.salary_to),
        display_opt(&v.currency),
        v.url
    )
}

pub fn format_details(v: &VacancyDetails) -> String {
    format!(
        "Company: {} | Vacancy: {} | Salary: {} - {} {} | Link: {}",
        v.employer_name,
        v.title,
        display_opt(&v.salary_from),
        display_opt(&v.salary_to),
        display_opt(&v.currency),
        v.url
    )
}

pub fn format_company_count(stat: &CompanyVacancyCount) -> String {
    format!("Company: {} | Vacancies: {}", stat.company, stat.vacancies_count)
}

async fn write_lines<W, I>(output: &mut W, header: &str, lines: I) -> Result<()>
where
    W: AsyncWrite + Unpin,
    I: IntoIterator<Item = String>,
{
    output.write_all(format!("\n{}\n\n", header).as_bytes()).await?;
    for line in lines {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    Ok(())
}

async fn prompt<R, W>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Blocking read-eval loop over the stored data. Ends on `0` or end of input.
pub async fn run_menu<Q, R, W>(queries: &Q, mut input: R, mut output: W) -> Result<()>
where
    Q: VacancyQueries,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        output.write_all(MENU_TEXT.as_bytes()).await?;
        let Some(raw) = prompt(&mut input, &mut output, "Your choice: ").await? else {
            break;
        };

        let Ok(choice) = raw.parse::<MenuChoice>() else {
            output
                .write_all(b"Invalid input, please try again.\n")
                .await?;
            continue;
        };

        match choice {
            MenuChoice::AllVacancies => {
                let items = queries.list_all_vacancies().await?;
                write_lines(&mut output, "All vacancies:", items.iter().map(format_listing))
                    .await?;
            }
            MenuChoice::AboveAverage => {
                let items = queries.vacancies_above_average().await?;
                write_lines(
                    &mut output,
                    "Vacancies with above-average salary:",
                    items.iter().map(format_details),
                )
                .await?;
            }
            MenuChoice::Search => {
                let Some(keyword) =
                    prompt(&mut input, &mut output, "Enter a keyword: ").await?
                else {
                    break;
                };
                let items = queries.search_by_keyword(&keyword).await?;
                write_lines(
                    &mut output,
                    &format!("Vacancies matching \"{}\":", keyword),
                    items.iter().map(format_details),
                )
                .await?;
            }
            MenuChoice::CompanyCounts => {
                let items = queries.company_vacancy_counts().await?;
                write_lines(
                    &mut output,
                    "Vacancy count per company:",
                    items.iter().map(format_company_count),
                )
                .await?;
            }
            MenuChoice::AverageSalary => {
                let avg = queries.average_salary().await?;
                output
                    .write_all(
                        format!("\nAverage salary across all vacancies: {:.2}\n", avg).as_bytes(),
                    )
                    .await?;
            }
            MenuChoice::Exit => {
                output.write_all(b"Exiting.\n").await?;
                break;
            }
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeQueries {
        searched: Mutex<Vec<String>>,
    }

    fn details(title: &str) -> VacancyDetails {
        VacancyDetails {
            vacancy_id: 10,
            employer_id: 1,
            title: title.to_string(),
            salary_from: Some(100_000),
            salary_to: Some(200_000),
            currency: Some("USD".to_string()),
            url: "https://hh.ru/vacancy/10".to_string(),
            description: Some(String::new()),
            employer_name: "Acme".to_string(),
        }
    }

    impl VacancyQueries for FakeQueries {
        async fn list_all_vacancies(&self) -> Result<Vec<VacancyListing>> {
            Ok(vec![VacancyListing {
                title: "Eng".to_string(),
                salary_from: Some(100_000),
                salary_to: Some(200_000),
                currency: Some("USD".to_string()),
                url: "https://hh.ru/vacancy/10".to_string(),
                employer_name: "Acme".to_string(),
            }])
        }

        async fn vacancies_above_average(&self) -> Result<Vec<VacancyDetails>> {
            Ok(vec![details("Senior Eng")])
        }

        async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<VacancyDetails>> {
            self.searched.lock().unwrap().push(keyword.to_string());
            Ok(vec![details("Rust Eng")])
        }

        async fn company_vacancy_counts(&self) -> Result<Vec<CompanyVacancyCount>> {
            Ok(vec![CompanyVacancyCount {
                company: "Acme".to_string(),
                vacancies_count: 1,
            }])
        }

        async fn average_salary(&self) -> Result<f64> {
            Ok(150_000.0)
        }
    }

    async fn run_with_input(queries: &FakeQueries, input: &str) -> String {
        let mut output = Vec::new();
        run_menu(queries, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_menu_choices() {
        assert_eq!("1".parse(), Ok(MenuChoice::AllVacancies));
        assert_eq!(" 3 ".parse(), Ok(MenuChoice::Search));
        assert_eq!("0".parse(), Ok(MenuChoice::Exit));
        assert!("9".parse::<MenuChoice>().is_err());
        assert!("".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn formats_missing_salary_as_blank() {
        let listing = VacancyListing {
            title: "Eng".to_string(),
            salary_from: None,
            salary_to: Some(5),
            currency: None,
            url: "u".to_string(),
            employer_name: "Acme".to_string(),
        };
        assert_eq!(
            format_listing(&listing),
            "Company: Acme | Vacancy: Eng | Salary:  - 5  | Link: u"
        );
    }

    #[tokio::test]
    async fn runs_each_query_and_exits() {
        let queries = FakeQueries::default();
        let output = run_with_input(&queries, "1\n2\n3\nrust\n4\n5\n0\n").await;

        assert!(output.contains(
            "Company: Acme | Vacancy: Eng | Salary: 100000 - 200000 USD | Link: https://hh.ru/vacancy/10"
        ));
        assert!(output.contains("Vacancy: Senior Eng"));
        assert!(output.contains("Vacancies matching \"rust\":"));
        assert!(output.contains("Vacancy: Rust Eng"));
        assert!(output.contains("Company: Acme | Vacancies: 1"));
        assert!(output.contains("Average salary across all vacancies: 150000.00"));
        assert!(output.ends_with("Exiting.\n"));
        assert_eq!(*queries.searched.lock().unwrap(), vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn invalid_input_reprompts() {
        let queries = FakeQueries::default();
        let output = run_with_input(&queries, "abc\n0\n").await;
        assert_eq!(output.matches("Invalid input, please try again.").count(), 1);
        assert_eq!(output.matches("Your choice: ").count(), 2);
    }

    #[tokio::test]
    async fn end_of_input_exits_quietly() {
        let queries = FakeQueries::default();
        let output = run_with_input(&queries, "5\n").await;
        assert!(output.contains("150000.00"));
        assert!(!output.contains("Exiting."));
    }
}
