// src/pipeline.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::{FetchError, ModelError};
use crate::extractor::sanitize_response;

/// Produces the rendered HTML for a job posting URL.
#[async_trait]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Turns page content into the model's raw (possibly fenced) JSON text.
#[async_trait]
pub trait FieldExtractor {
    async fn extract(&self, content: &str) -> Result<String, ModelError>;
}

/// The four fields the model is asked for. Every field defaults to an empty
/// string so a partial response still yields a complete row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionFields {
    pub title: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub location: String,
    pub description: String,
}

/// One normalized output row. `applied_date` is populated only when date
/// stamping is enabled for the run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRow {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub applied_date: Option<String>,
    pub description: String,
    pub link: String,
}

impl JobRow {
    fn new(fields: ExtractionFields, applied_date: Option<String>, link: String) -> Self {
        Self {
            title: fields.title,
            company_name: fields.company_name,
            location: fields.location,
            applied_date,
            description: fields.description,
            link,
        }
    }
}

/// Format the "Applied Date" stamp: abbreviated month plus unpadded day,
/// e.g. "Oct 5".
pub fn applied_date_stamp(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Drives fetch -> extract -> sanitize -> parse for each URL, strictly
/// sequentially. Every per-URL failure is logged and skipped; the batch
/// never aborts because of a single bad page or a garbage model response.
pub struct BatchPipeline<'a> {
    fetcher: &'a dyn PageSource,
    extractor: &'a dyn FieldExtractor,
    applied_date: Option<String>,
}

impl<'a> BatchPipeline<'a> {
    pub fn new(fetcher: &'a dyn PageSource, extractor: &'a dyn FieldExtractor) -> Self {
        Self {
            fetcher,
            extractor,
            applied_date: None,
        }
    }

    /// Stamp every row with the given run date.
    pub fn with_applied_date(mut self, date: NaiveDate) -> Self {
        self.applied_date = Some(applied_date_stamp(date));
        self
    }

    pub async fn run(&self, urls: &[String]) -> Vec<JobRow> {
        let mut rows = Vec::new();

        for url in urls {
            let content = match self.fetcher.fetch(url).await {
                Ok(content) => content,
                Err(e) => {
                    error!("Failed to fetch {}: {}", url, e);
                    continue;
                }
            };

            let response = match self.extractor.extract(&content).await {
                Ok(response) => response,
                Err(e) => {
                    error!("Model extraction failed for {}: {}", url, e);
                    continue;
                }
            };

            let cleaned = sanitize_response(&response);
            let fields: ExtractionFields = match serde_json::from_str(&cleaned) {
                Ok(fields) => fields,
                Err(e) => {
                    error!("JSON parse error for {}: {}", url, e);
                    continue;
                }
            };

            info!("Extracted '{}' from {}", fields.title, url);
            rows.push(JobRow::new(fields, self.applied_date.clone(), url.clone()));
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StubSource {
        pages: HashMap<String, String>,
    }

    impl StubSource {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PageSource for StubSource {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::NavigationTimeout {
                    url: url.to_string(),
                    timeout_secs: 30,
                })
        }
    }

    /// Echoes the page "content" back as the model response.
    struct EchoExtractor;

    #[async_trait]
    impl FieldExtractor for EchoExtractor {
        async fn extract(&self, content: &str) -> Result<String, ModelError> {
            Ok(content.to_string())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl FieldExtractor for FailingExtractor {
        async fn extract(&self, _content: &str) -> Result<String, ModelError> {
            Err(ModelError::EmptyResponse)
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_url_and_continues() {
        let source = StubSource::new(&[(
            "https://jobs.example/ok",
            r#"{"title":"Engineer","companyName":"Acme","location":"Remote","description":"Build things"}"#,
        )]);
        let pipeline = BatchPipeline::new(&source, &EchoExtractor);

        let rows = pipeline
            .run(&urls(&["https://jobs.example/down", "https://jobs.example/ok"]))
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Engineer");
        assert_eq!(rows[0].link, "https://jobs.example/ok");
    }

    #[tokio::test]
    async fn test_fenced_model_response_yields_row() {
        let source = StubSource::new(&[(
            "https://jobs.example/a",
            "```json\n{\"title\":\"Engineer\",\"companyName\":\"Acme\",\"location\":\"Remote\",\"description\":\"Build things\"}\n```",
        )]);
        let pipeline = BatchPipeline::new(&source, &EchoExtractor);

        let rows = pipeline.run(&urls(&["https://jobs.example/a"])).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Engineer");
        assert_eq!(rows[0].company_name, "Acme");
        assert_eq!(rows[0].location, "Remote");
        assert_eq!(rows[0].description, "Build things");
        assert_eq!(rows[0].applied_date, None);
    }

    #[tokio::test]
    async fn test_unparseable_response_skips_url_only() {
        let source = StubSource::new(&[
            ("https://jobs.example/garbage", "the model apologizes at length"),
            (
                "https://jobs.example/fine",
                r#"{"title":"Analyst","companyName":"Beta","location":"NYC","description":"Spreadsheets"}"#,
            ),
        ]);
        let pipeline = BatchPipeline::new(&source, &EchoExtractor);

        let rows = pipeline
            .run(&urls(&[
                "https://jobs.example/garbage",
                "https://jobs.example/fine",
            ]))
            .await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Analyst");
    }

    #[tokio::test]
    async fn test_model_error_skips_url() {
        let source = StubSource::new(&[("https://jobs.example/a", "<html></html>")]);
        let pipeline = BatchPipeline::new(&source, &FailingExtractor);

        let rows = pipeline.run(&urls(&["https://jobs.example/a"])).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_empty_strings() {
        let source = StubSource::new(&[("https://jobs.example/a", r#"{"title":"Engineer"}"#)]);
        let pipeline = BatchPipeline::new(&source, &EchoExtractor);

        let rows = pipeline.run(&urls(&["https://jobs.example/a"])).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Engineer");
        assert_eq!(rows[0].company_name, "");
        assert_eq!(rows[0].location, "");
        assert_eq!(rows[0].description, "");
    }

    #[tokio::test]
    async fn test_rows_preserve_input_order() {
        let source = StubSource::new(&[
            ("u1", r#"{"title":"First"}"#),
            ("u2", r#"{"title":"Second"}"#),
            ("u3", r#"{"title":"Third"}"#),
        ]);
        let pipeline = BatchPipeline::new(&source, &EchoExtractor);

        let rows = pipeline.run(&urls(&["u1", "u2", "u3"])).await;

        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_applied_date_stamps_every_row() {
        let source = StubSource::new(&[("u1", r#"{"title":"Engineer"}"#)]);
        let date = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        let pipeline = BatchPipeline::new(&source, &EchoExtractor).with_applied_date(date);

        let rows = pipeline.run(&urls(&["u1"])).await;
        assert_eq!(rows[0].applied_date.as_deref(), Some("Oct 5"));
    }

    #[test]
    fn test_applied_date_stamp_format() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        assert_eq!(applied_date_stamp(date), "Oct 5");

        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(applied_date_stamp(date), "Dec 31");
    }

    #[test]
    fn test_extraction_fields_ignore_unknown_keys() {
        let fields: ExtractionFields =
            serde_json::from_str(r#"{"title":"Engineer","salary":"lots"}"#).unwrap();
        assert_eq!(fields.title, "Engineer");
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(serde_json::from_str::<ExtractionFields>(r#""just a string""#).is_err());
        assert!(serde_json::from_str::<ExtractionFields>("[1,2,3]").is_err());
    }
}
