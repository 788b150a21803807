//! Batch extraction of structured job-posting data.
//!
//! Given a newline-delimited list of job URLs, each page is rendered in an
//! isolated Chromium session, the HTML is handed to Gemini for structured
//! field extraction, and the surviving rows are written to a spreadsheet.
//! A failure on one URL never aborts the rest of the batch.

pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod input;
pub mod pipeline;
pub mod report;

pub use config::AppConfig;
pub use error::{FetchError, ModelError, WriteError};
pub use extractor::{sanitize_response, GeminiClient};
pub use fetcher::PageFetcher;
pub use input::read_job_links;
pub use pipeline::{BatchPipeline, FieldExtractor, JobRow, PageSource};
pub use report::{write_report, ReportFormat};
