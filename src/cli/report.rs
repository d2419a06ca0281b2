//! CLI command for reports

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Args;

use crate::config::settings::Settings;
use crate::error::{TrafficError, TrafficResult};
use crate::models::Period;
use crate::reports::{ReportFilter, TrafficReport, ViewMode};
use crate::storage::Storage;

/// Report arguments
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Year to report on (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month to report on, 1-12 (defaults to the current month)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// View mode: month or year (defaults to the configured view)
    #[arg(short, long)]
    pub view: Option<ViewMode>,

    /// Step back one month (or one year in the year view)
    #[arg(long, conflicts_with = "next")]
    pub prev: bool,

    /// Step forward one month (or one year in the year view)
    #[arg(long)]
    pub next: bool,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ReportArgs {
    /// Resolve defaults into a concrete filter
    ///
    /// An explicit `--month` implies the month view unless `--view` says
    /// otherwise. `--prev` and `--next` shift the resolved month or year.
    pub fn filter(&self, settings: &Settings, today: Period) -> TrafficResult<ReportFilter> {
        let view_mode = match (self.view, self.month) {
            (Some(view), _) => view,
            (None, Some(_)) => ViewMode::Month,
            (None, None) => settings.default_view_mode,
        };
        let year = self.year.unwrap_or(today.year());

        match view_mode {
            ViewMode::Month => {
                let period = Period::new(year, self.month.unwrap_or(today.month()))?;
                let period = match (self.prev, self.next) {
                    (true, _) => period.prev()?,
                    (_, true) => period.next()?,
                    _ => period,
                };
                Ok(ReportFilter::for_period(period))
            }
            ViewMode::Year => {
                let year = match (self.prev, self.next) {
                    (true, _) => year.saturating_sub(1),
                    (_, true) => year.saturating_add(1),
                    _ => year,
                };
                // Same four-digit range as periods
                Period::new(year, 1)?;
                Ok(ReportFilter::year(year))
            }
        }
    }
}

/// Handle the report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ReportArgs,
) -> TrafficResult<()> {
    let filter = args.filter(settings, Period::current())?;
    let report = TrafficReport::from_storage(storage, filter, &settings.unknown_category_label)?;

    if let Some(path) = args.output {
        let file = File::create(&path).map_err(|e| {
            TrafficError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        report.export_csv(BufWriter::new(file))?;
        println!("Report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal());
    }

    Ok(())
}
