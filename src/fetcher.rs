// src/fetcher.rs
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::pipeline::PageSource;

const VIEWPORT_WIDTH: u32 = 1920;
const VIEWPORT_HEIGHT: u32 = 1080;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const NAVIGATION_TIMEOUT_SECS: u64 = 30;
const SETTLE_DELAY_MS: u64 = 200;

/// Renders pages in an isolated Chromium session per call: fresh browser,
/// fixed viewport, desktop user-agent, torn down before the call returns.
///
/// Sessions run headless unless the URL matches one of the headful host
/// rules; some job boards refuse to serve fully headless browsers.
pub struct PageFetcher {
    headful_hosts: Vec<String>,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl PageFetcher {
    pub fn new(headful_hosts: Vec<String>) -> Self {
        Self {
            headful_hosts,
            navigation_timeout: Duration::from_secs(NAVIGATION_TIMEOUT_SECS),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
        }
    }

    fn wants_visible_browser(&self, url: &str) -> bool {
        self.headful_hosts.iter().any(|host| url.contains(host))
    }

    fn browser_config(&self, visible: bool) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", USER_AGENT));

        if visible {
            builder = builder.with_head();
        }

        builder.build().map_err(FetchError::BrowserConfig)
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<String, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|source| FetchError::Navigation {
                url: url.to_string(),
                source,
            })?;

        self.navigate(&page, url).await?;

        // Late-rendering content gets a fixed settle period after load.
        tokio::time::sleep(self.settle_delay).await;

        page.content().await.map_err(FetchError::Content)
    }

    async fn navigate(&self, page: &Page, url: &str) -> Result<(), FetchError> {
        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), CdpError>(())
        };

        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(FetchError::Navigation {
                url: url.to_string(),
                source,
            }),
            Err(_) => Err(FetchError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: self.navigation_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let visible = self.wants_visible_browser(url);
        if visible {
            debug!("Headful session for {}", url);
        }

        info!("Fetching job post: {}", url);

        let config = self.browser_config(visible)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(FetchError::Launch)?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let result = self.render(&browser, url).await;

        // Teardown happens on every exit path before the result propagates.
        if let Err(e) = browser.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        events.abort();

        result
    }
}
