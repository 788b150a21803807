// src/report.rs
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::info;

use crate::error::WriteError;
use crate::pipeline::JobRow;

/// Report file format, picked from the output path extension. Anything that
/// is not `.csv` gets the default spreadsheet format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ReportFormat::Csv,
            _ => ReportFormat::Xlsx,
        }
    }
}

fn header(applied_date: bool) -> Vec<&'static str> {
    if applied_date {
        vec![
            "Title",
            "Company Name",
            "Location",
            "Applied Date",
            "Description",
            "Job Link",
        ]
    } else {
        vec!["Title", "Company Name", "Location", "Description", "Job Link"]
    }
}

fn cells(row: &JobRow, applied_date: bool) -> Vec<&str> {
    if applied_date {
        vec![
            &row.title,
            &row.company_name,
            &row.location,
            row.applied_date.as_deref().unwrap_or(""),
            &row.description,
            &row.link,
        ]
    } else {
        vec![
            &row.title,
            &row.company_name,
            &row.location,
            &row.description,
            &row.link,
        ]
    }
}

/// Serialize the accumulated rows as a rectangular table with a fixed header,
/// overwriting any existing file at `path`.
pub fn write_report(rows: &[JobRow], path: &Path, applied_date: bool) -> Result<(), WriteError> {
    match ReportFormat::from_path(path) {
        ReportFormat::Xlsx => write_xlsx(rows, path, applied_date)?,
        ReportFormat::Csv => write_csv(rows, path, applied_date)?,
    }

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_xlsx(rows: &[JobRow], path: &Path, applied_date: bool) -> Result<(), WriteError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in header(applied_date).iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in cells(row, applied_date).iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(rows: &[JobRow], path: &Path, applied_date: bool) -> Result<(), WriteError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(header(applied_date))?;
    for row in rows {
        writer.write_record(cells(row, applied_date))?;
    }

    writer.flush()?;
    Ok(())
}
