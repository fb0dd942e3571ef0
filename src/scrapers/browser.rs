use anyhow::{anyhow, Context};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, ScoutError};
use crate::scrapers::selectors::{Locator, Query};
use crate::scrapers::traits::PageDriver;
use crate::scrapers::wait::Condition;

/// Checks layout visibility, and for `clickable` also that the element is enabled
const VISIBILITY_PROBE: &str = r#"
function(clickable) {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    const visible = rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
    return clickable ? visible && !this.disabled : visible;
}
"#;

/// [`PageDriver`] backed by a local Chrome instance
pub struct ChromeDriver {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    /// Launch Chrome and drive the tab it opens at startup
    pub fn launch(headless: bool) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", headless);

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser
            .wait_for_initial_tab()
            .context("Chrome did not open its initial tab")?;

        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }

    fn browser(&self) -> Result<&Browser> {
        self.browser
            .as_ref()
            .ok_or_else(|| ScoutError::Browser(anyhow!("browser session already closed")))
    }

    fn tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser()?
            .get_tabs()
            .lock()
            .map_err(|_| anyhow!("browser tab list lock poisoned"))?;
        Ok(tabs.clone())
    }

    fn find(&self, locator: &Locator) -> anyhow::Result<Element<'_>> {
        let found = match locator.to_query() {
            Query::Css(css) => self.tab.find_element(&css),
            Query::XPath(xpath) => self.tab.find_element_by_xpath(&xpath),
        };
        found.with_context(|| format!("No element matches {}", locator))
    }
}

impl PageDriver for ChromeDriver {
    fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to open {}", url))?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn probe(&mut self, locator: &Locator, condition: Condition) -> Result<bool> {
        let Ok(element) = self.find(locator) else {
            return Ok(false);
        };

        let clickable = condition == Condition::Clickable;
        let result = element.call_js_fn(VISIBILITY_PROBE, vec![json!(clickable)], false)?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        debug!("Clicking {}", locator);
        self.find(locator)?.click()?;
        Ok(())
    }

    fn type_text(&mut self, locator: &Locator, text: &str) -> Result<()> {
        debug!("Typing into {}", locator);
        self.find(locator)?.type_into(text)?;
        Ok(())
    }

    fn element_html(&mut self, locator: &Locator) -> Result<String> {
        Ok(self.find(locator)?.get_content()?)
    }

    fn window_count(&mut self) -> Result<usize> {
        Ok(self.tabs()?.len())
    }

    fn current_window(&mut self) -> Result<usize> {
        self.tabs()?
            .iter()
            .position(|tab| Arc::ptr_eq(tab, &self.tab))
            .ok_or_else(|| ScoutError::Browser(anyhow!("focused tab is no longer open")))
    }

    fn switch_to_window(&mut self, index: usize) -> Result<()> {
        let tab = self
            .tabs()?
            .get(index)
            .cloned()
            .ok_or(ScoutError::NoSuchWindow { index })?;
        tab.activate()?;
        self.tab = tab;
        Ok(())
    }

    fn close_window(&mut self) -> Result<()> {
        self.tab.close(true)?;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        if self.browser.take().is_some() {
            info!("Browser session closed");
        }
        Ok(())
    }
}
