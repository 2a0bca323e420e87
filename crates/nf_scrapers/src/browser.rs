use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use futures::StreamExt;
use nf_core::{Error, Result};
use tokio::task::JoinHandle;
use tracing::debug;

/// Injected before any site script runs; hides the automation marker that
/// bot-blocking sites key on.
const STEALTH_JS: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// A headless browser session for sources that block plain HTTP fetches.
/// Interchangeable with [`crate::sites::SiteClient`] at the scraper level:
/// both yield page HTML for the same contract.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(Error::Scrape)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Scrape(format!("browser launch failed: {}", e)))?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        Ok(Self { browser, handler })
    }

    /// Navigate to `url` and return the rendered page HTML.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Scrape(format!("page open failed: {}", e)))?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_JS))
            .await
            .map_err(|e| Error::Scrape(format!("stealth injection failed: {}", e)))?;
        page.goto(url)
            .await
            .map_err(|e| Error::Scrape(format!("navigation to {} failed: {}", url, e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| Error::Scrape(format!("load of {} failed: {}", url, e)))?;
        let html = page
            .content()
            .await
            .map_err(|e| Error::Scrape(format!("content read for {} failed: {}", url, e)))?;
        if let Err(e) = page.close().await {
            debug!(url, error = %e, "page close failed");
        }
        Ok(html)
    }

    pub async fn close(mut self) {
        let _ = self.browser.close().await;
        self.handler.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
