use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};

use crate::api::ApiClient;
use crate::error::{ConsoleError, ExportError};
use crate::model::{Customer, ReportRow};
use crate::report::{export_to_dir, DateRange, Exporter, ReportQuery, ReportSummary, Statement, StatementExporter};
use crate::state::Notifications;

pub struct ReportsView {
    api: ApiClient,
    notifications: Notifications,
    /// Active customers only, for the customer picker.
    pub customers: Vec<Customer>,
    pub query: ReportQuery,
    rows: Vec<ReportRow>,
    /// Customer and range the current rows were fetched for.
    generated: Option<(i64, DateRange)>,
}

impl ReportsView {
    /// Starts with the trailing thirty days ending `today` preselected.
    pub fn new(api: ApiClient, notifications: Notifications, today: NaiveDate) -> ReportsView {
        let range = DateRange::trailing(today);
        ReportsView {
            api,
            notifications,
            customers: Vec::new(),
            query: ReportQuery {
                customer_id: None,
                start: Some(range.start()),
                end: Some(range.end()),
            },
            rows: Vec::new(),
            generated: None,
        }
    }

    pub async fn load_customers(&mut self) -> Result<(), ConsoleError> {
        match self.api.customers().await {
            Ok(customers) => {
                self.customers = customers.into_iter().filter(|c| c.active).collect();
                Ok(())
            },
            Err(err) => {
                self.notifications.error("Error loading customers");
                Err(err.into())
            },
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_rows(&self.rows)
    }

    /// Name of the customer the current report belongs to.
    pub fn customer_name(&self) -> &str {
        self.generated
            .and_then(|(id, _)| self.customers.iter().find(|c| c.id == Some(id)))
            .map(|c| c.name.as_str())
            .unwrap_or("N/A")
    }

    /// Fetches the report using local day boundaries.
    pub async fn generate(&mut self, today: NaiveDate) -> Result<ReportSummary, ConsoleError> {
        self.generate_in(today, &Local).await
    }

    /// Fetches the report with day boundaries taken in `tz`. An empty result is
    /// reported as information, not as a failure.
    pub async fn generate_in<Tz: TimeZone>(&mut self, today: NaiveDate, tz: &Tz) -> Result<ReportSummary, ConsoleError> {
        let checked = self
            .query
            .validate(today)
            .and_then(|(customer_id, range)| Ok((customer_id, range, range.bounds(tz)?)));
        let (customer_id, range, bounds) = match checked {
            Ok(checked) => checked,
            Err(err) => {
                self.notifications.error(err.to_string());
                return Err(err.into());
            },
        };

        match self.api.report(customer_id, &bounds).await {
            Ok(rows) => {
                self.rows = rows;
                self.generated = Some((customer_id, range));
                if self.rows.is_empty() {
                    self.notifications.info("No movements found in the selected date range");
                } else {
                    self.notifications.success("Report generated successfully");
                }
                Ok(self.summary())
            },
            Err(err) => {
                self.notifications.error(format!("Error generating report: {}", err));
                Err(err.into())
            },
        }
    }

    /// Writes the current report to `dir`. Refused while there is nothing to export.
    pub fn export(&self, exporter: Exporter, dir: &Path) -> Result<PathBuf, ConsoleError> {
        let Some((_, range)) = self.generated.filter(|_| !self.rows.is_empty()) else {
            self.notifications.error(ExportError::EmptyReport.to_string());
            return Err(ExportError::EmptyReport.into());
        };

        let statement = Statement {
            customer: self.customer_name(),
            range,
            generated_at: Local::now(),
            rows: &self.rows,
        };

        match export_to_dir(&exporter, &statement, dir) {
            Ok(path) => {
                self.notifications.success(format!("{} downloaded successfully", exporter.label()));
                Ok(path)
            },
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err.into())
            },
        }
    }
}
