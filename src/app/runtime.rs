use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::adapters::csv_export::export_outages;
use crate::adapters::meraki_api::DashboardClient;
use crate::app::error::AppError;
use crate::domain::change_history::normalize_batch;
use crate::domain::models::Organization;
use crate::domain::outage::reconstruct_outages;

pub const COMPLETED_MESSAGE: &str =
    "Process completed. Check the log file for details and the CSV files for results.";
pub const NO_ORGANIZATIONS_MESSAGE: &str =
    "Failed to retrieve organizations. Check the log file for details.";
pub const FAILURE_MESSAGE: &str = "An error occurred. Please check the log file for details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Exported { path: PathBuf, outages: usize },
    NoChangeHistory,
    NoOutages,
    ExportFailed,
}

pub struct OutagePipeline<'a> {
    client: &'a dyn DashboardClient,
    output_csv: PathBuf,
}

impl<'a> OutagePipeline<'a> {
    pub fn new(client: &'a dyn DashboardClient, output_csv: PathBuf) -> Self {
        Self { client, output_csv }
    }

    pub fn organizations(&self) -> Vec<Organization> {
        match self.client.list_organizations() {
            Ok(organizations) => {
                tracing::info!(count = organizations.len(), "fetched organizations");
                organizations
            }
            Err(error) => {
                tracing::error!(error = %error, "error fetching organizations");
                Vec::new()
            }
        }
    }

    pub fn run(&self, org_id: &str) -> PipelineOutcome {
        tracing::info!(org_id, "outage report started");

        let records = match self.client.fetch_change_history(org_id) {
            Ok(records) => records,
            Err(error) => {
                tracing::error!(org_id, error = %error, "error fetching device change history");
                Vec::new()
            }
        };
        if records.is_empty() {
            tracing::error!(org_id, "no device change history retrieved; stopping");
            return PipelineOutcome::NoChangeHistory;
        }

        let batch = normalize_batch(&records);
        tracing::info!(
            records = records.len(),
            events = batch.events.len(),
            rejected = batch.rejected,
            "analyzing device offline events"
        );

        let outages = reconstruct_outages(&batch.events);
        tracing::info!(outages = outages.len(), "finished analyzing device offline events");

        if outages.is_empty() {
            tracing::info!(org_id, "no offline durations found");
            return PipelineOutcome::NoOutages;
        }

        match export_outages(&self.output_csv, &outages) {
            Ok(()) => PipelineOutcome::Exported {
                path: self.output_csv.clone(),
                outages: outages.len(),
            },
            Err(error) => {
                tracing::error!(
                    path = %self.output_csv.display(),
                    error = %error,
                    "error saving outage report"
                );
                PipelineOutcome::ExportFailed
            }
        }
    }
}

pub fn run_for_organization(pipeline: &OutagePipeline<'_>, org_id: &str) -> Option<PipelineOutcome> {
    if pipeline.organizations().is_empty() {
        tracing::error!("failed to retrieve organizations; stopping");
        return None;
    }

    let outcome = pipeline.run(org_id);
    tracing::info!(org_id, outcome = ?outcome, "outage report completed");
    Some(outcome)
}

pub fn run_interactive<R, W>(
    pipeline: &OutagePipeline<'_>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<PipelineOutcome>, AppError>
where
    R: BufRead,
    W: Write,
{
    let organizations = pipeline.organizations();
    if organizations.is_empty() {
        writeln!(output, "{NO_ORGANIZATIONS_MESSAGE}")?;
        return Ok(None);
    }

    writeln!(output, "Available Organizations:")?;
    for (index, organization) in organizations.iter().enumerate() {
        writeln!(
            output,
            "{}: {} (ID: {})",
            index + 1,
            organization.name,
            organization.id
        )?;
    }
    write!(
        output,
        "Please enter the number of the organization you want to use: "
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let organization = select_organization(&organizations, &line)?;

    let outcome = pipeline.run(&organization.id);
    tracing::info!(org_id = %organization.id, outcome = ?outcome, "outage report completed");

    writeln!(output, "{COMPLETED_MESSAGE}")?;
    Ok(Some(outcome))
}

pub fn select_organization<'a>(
    organizations: &'a [Organization],
    raw: &str,
) -> Result<&'a Organization, AppError> {
    let trimmed = raw.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| AppError::invalid_selection(format!("expected a number, got {trimmed:?}")))?;

    choice
        .checked_sub(1)
        .and_then(|index| organizations.get(index))
        .ok_or_else(|| {
            AppError::invalid_selection(format!(
                "expected a number between 1 and {}, got {choice}",
                organizations.len()
            ))
        })
}
