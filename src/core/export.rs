//! Workbook export - renders computed report aggregates as tabular sheets.
//!
//! Purely a formatting concern: four sheets (Summary, Clients, Employees,
//! Finance) built from an already-computed [`PeriodReport`], rendered as CSV
//! that Excel opens cleanly (UTF-8 BOM, semicolon separator). Files are
//! written on demand and named `reports_<from>_<to>_<sheet>.csv`; nothing is
//! persisted beyond the requested files.

use crate::core::report::PeriodReport;
use crate::errors::Result;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// UTF-8 byte-order mark so Excel decodes non-ASCII names correctly.
const BOM: &[u8] = b"\xEF\xBB\xBF";
/// Column separator; semicolon keeps Excel happy in comma-decimal locales.
const SEP: &str = ";";

/// One tabular sheet of the exported workbook.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet name, also used in the file name
    pub name: &'static str,
    /// Column headers
    pub headers: Vec<&'static str>,
    /// Data rows, already formatted as display strings
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Renders the sheet as CSV text (without the BOM).
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.headers.join(SEP));
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|v| escape_csv(v)).collect();
            out.push_str(&line.join(SEP));
            out.push('\n');
        }
        out
    }
}

fn escape_csv(value: &str) -> String {
    if value.contains(';') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// Builds the four report sheets from computed aggregates.
#[must_use]
pub fn build_report_workbook(report: &PeriodReport) -> Vec<Sheet> {
    let summary = &report.summary;

    let summary_sheet = Sheet {
        name: "Summary",
        headers: vec![
            "Period from",
            "Period to",
            "Orders",
            "Orders total",
            "Payments",
            "Payments total",
            "Paid ratio (%)",
            "Estimated receivable",
        ],
        rows: vec![vec![
            report.date_from.to_string(),
            report.date_to.to_string(),
            summary.orders_count.to_string(),
            money(summary.orders_sum),
            summary.payments_count.to_string(),
            money(summary.payments_sum),
            format!("{:.0}", summary.paid_ratio * 100.0),
            money(summary.estimated_receivable),
        ]],
    };

    let clients_sheet = Sheet {
        name: "Clients",
        headers: vec!["Client", "Order count", "Orders total"],
        rows: report
            .top_clients
            .iter()
            .map(|r| vec![r.name.clone(), r.count.to_string(), money(r.sum)])
            .collect(),
    };

    let employees_sheet = Sheet {
        name: "Employees",
        headers: vec!["Employee", "Order count", "Orders total"],
        rows: report
            .top_employees
            .iter()
            .map(|r| vec![r.name.clone(), r.count.to_string(), money(r.sum)])
            .collect(),
    };

    let finance_sheet = Sheet {
        name: "Finance",
        headers: vec!["Payment method", "Payments total"],
        rows: report
            .by_method
            .iter()
            .map(|(method, sum)| vec![method.label().to_string(), money(*sum)])
            .collect(),
    };

    vec![summary_sheet, clients_sheet, employees_sheet, finance_sheet]
}

/// Base file name for the workbook: `reports_<from>_<to>`.
#[must_use]
pub fn workbook_base_name(report: &PeriodReport) -> String {
    format!("reports_{}_{}", report.date_from, report.date_to)
}

/// Writes every sheet of the workbook into `dir` and returns the written
/// paths, in sheet order.
pub fn write_workbook(dir: &Path, report: &PeriodReport) -> Result<Vec<PathBuf>> {
    let base = workbook_base_name(report);
    let mut paths = Vec::new();

    for sheet in build_report_workbook(report) {
        let path = dir.join(format!("{base}_{}.csv", sheet.name));
        let mut file = std::fs::File::create(&path)?;
        file.write_all(BOM)?;
        file.write_all(sheet.to_csv().as_bytes())?;
        paths.push(path);
    }

    Ok(paths)
}
