// src/error.rs
use chromiumoxide::error::CdpError;
use thiserror::Error;

/// Failures while rendering a page in the browser. All of these are recovered
/// at the pipeline level: the URL is logged and skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build browser config: {0}")]
    BrowserConfig(String),

    #[error("failed to launch browser: {0}")]
    Launch(#[source] CdpError),

    #[error("navigation failed for {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: CdpError,
    },

    #[error("navigation timed out after {timeout_secs}s for {url}")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("failed to read page content: {0}")]
    Content(#[source] CdpError),
}

/// Failures from the language-model call. Also recovered per URL.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to Gemini failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Gemini response contained no text candidates")]
    EmptyResponse,
}

/// Failures while writing the final report. Fatal: the run ends without a report.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write xlsx report: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write csv report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush report file: {0}")]
    Io(#[from] std::io::Error),
}
