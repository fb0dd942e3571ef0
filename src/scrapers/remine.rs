use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, ScoutError};
use crate::models::ScrapedFields;
use crate::scrapers::extract;
use crate::scrapers::selectors::{Role, SiteMap};
use crate::scrapers::traits::PageDriver;
use crate::scrapers::wait::{BoundedWait, Condition};

/// Portal login details
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub login_url: String,
    pub remine_search: String,
}

/// Uppercase and trim a typed address for use as the search query
pub fn normalize_address(input: &str) -> Result<String> {
    let address = input.trim().to_uppercase();
    if address.is_empty() {
        return Err(ScoutError::Input {
            message: "property address is empty".to_string(),
        });
    }
    Ok(address)
}

/// Drives the portal login and Remine property search
pub struct RemineFlow<'a, D: PageDriver> {
    driver: &'a mut D,
    sites: SiteMap,
    wait: BoundedWait,
    settle_delay: Duration,
}

impl<'a, D: PageDriver> RemineFlow<'a, D> {
    pub fn new(driver: &'a mut D, wait: BoundedWait) -> Self {
        Self {
            driver,
            sites: SiteMap::remine(),
            wait,
            settle_delay: Duration::from_secs(3),
        }
    }

    pub fn with_site_map(mut self, sites: SiteMap) -> Self {
        self.sites = sites;
        self
    }

    /// Pause after expanding the public records, before reading them
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Login, open Remine, find the property and read its public records
    pub fn run(&mut self, credentials: &Credentials, address: &str) -> Result<ScrapedFields> {
        self.login(&credentials.username, &credentials.password, &credentials.login_url)?;
        self.navigate_to_remine()?;
        self.search_property(&credentials.remine_search, address)?;
        self.scrape_public_records()
    }

    fn wait_for(&mut self, role: Role, condition: Condition) -> Result<()> {
        let locator = self.sites.locator(role).clone();
        debug!("Waiting for {} ({})", role, locator);

        let driver = &mut *self.driver;
        self.wait
            .until(|| driver.probe(&locator, condition))?
            .require(role)
    }

    fn wait_for_window_count<F>(&mut self, role: Role, accept: F) -> Result<()>
    where
        F: Fn(usize) -> bool,
    {
        let driver = &mut *self.driver;
        self.wait
            .until(|| Ok(accept(driver.window_count()?)))?
            .require(role)
    }

    /// Click `role`, wait for the window it opens and return that window's
    /// index together with the count before the click.
    fn click_opening_window(&mut self, role: Role) -> Result<(usize, usize)> {
        let before = self.driver.window_count()?;
        self.click(role)?;
        self.wait_for_window_count(role, |count| count > before)?;

        let newest = self.driver.window_count()? - 1;
        debug!("{} opened window {}", role, newest);
        Ok((before, newest))
    }

    fn click(&mut self, role: Role) -> Result<()> {
        self.driver.click(self.sites.locator(role))
    }

    pub fn login(&mut self, username: &str, password: &str, login_url: &str) -> Result<()> {
        info!("Logging in to portal...");
        self.driver.navigate(login_url)?;

        self.wait_for(Role::LoginUsername, Condition::Visible)?;
        self.wait_for(Role::LoginPassword, Condition::Visible)?;
        self.wait_for(Role::LoginSubmit, Condition::Visible)?;

        self.driver.type_text(self.sites.locator(Role::LoginUsername), username)?;
        self.driver.type_text(self.sites.locator(Role::LoginPassword), password)?;
        self.click(Role::LoginSubmit)
    }

    /// Open Remine from the portal's products menu. The portal opens an extra
    /// window on the way; it is closed and focus returns to the portal window.
    pub fn navigate_to_remine(&mut self) -> Result<()> {
        info!("Opening Remine from the products menu...");
        self.wait_for(Role::ProductsMenu, Condition::Visible)?;
        self.click(Role::ProductsMenu)?;

        let link = self.sites.locator(Role::RemineLink).clone();
        let driver = &mut *self.driver;
        BoundedWait::immediate(|| driver.probe(&link, Condition::Visible))?.require(Role::RemineLink)?;
        let home = self.driver.current_window()?;
        let (before, popup) = self.click_opening_window(Role::RemineLink)?;

        self.driver.switch_to_window(popup)?;
        self.driver.close_window()?;
        self.wait_for_window_count(Role::RemineLink, |count| count <= before)?;
        self.driver.switch_to_window(home)
    }

    pub fn search_property(&mut self, remine_search: &str, address: &str) -> Result<()> {
        info!("Searching Remine for {}", address);
        self.driver.navigate(remine_search)?;

        self.wait_for(Role::SearchField, Condition::Visible)?;
        self.driver.type_text(self.sites.locator(Role::SearchField), address)?;
        self.click(Role::SearchField)?;

        self.wait_for(Role::AddressResult, Condition::Visible)?;
        self.click(Role::AddressResult)?;

        self.wait_for(Role::SelectAllToggle, Condition::Clickable)?;
        // The property page opens in a new tab
        let (_, property_tab) = self.click_opening_window(Role::SelectAllToggle)?;
        self.driver.switch_to_window(property_tab)?;

        self.wait_for(Role::SeeAllButton, Condition::Clickable)?;
        self.click(Role::SeeAllButton)?;

        thread::sleep(self.settle_delay);
        Ok(())
    }

    pub fn scrape_public_records(&mut self) -> Result<ScrapedFields> {
        self.wait_for(Role::PublicRecords, Condition::Visible)?;
        let html = self.driver.element_html(self.sites.locator(Role::PublicRecords))?;

        let fields = extract::public_record_texts(&html);
        info!("✅ Read {} public record strings", fields.len());
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::selectors::Locator;
    use std::collections::HashSet;

    /// Scripted driver: elements listed in `present` are always visible and
    /// clickable; clicking the toggles in `opens_window` adds a window.
    /// A closed window still shows up in the first count taken afterwards,
    /// the way Chrome reports target removal late.
    #[derive(Default)]
    struct FakeDriver {
        present: HashSet<String>,
        opens_window: HashSet<String>,
        windows: usize,
        focused: usize,
        pending_close: bool,
        html: String,
        actions: Vec<String>,
    }

    impl FakeDriver {
        fn with_all_roles(sites: &SiteMap) -> Self {
            let mut driver = FakeDriver {
                windows: 1,
                ..Default::default()
            };
            for role in Role::ALL {
                driver.present.insert(sites.locator(role).to_string());
            }
            driver.opens_window.insert(sites.locator(Role::RemineLink).to_string());
            driver.opens_window.insert(sites.locator(Role::SelectAllToggle).to_string());
            driver.html = "<ul><li><p>Zoning</p><p>R5</p></li><li><p>Beds</p><p>2</p></li></ul>".into();
            driver
        }
    }

    impl PageDriver for FakeDriver {
        fn navigate(&mut self, url: &str) -> Result<()> {
            self.actions.push(format!("navigate {}", url));
            Ok(())
        }

        fn probe(&mut self, locator: &Locator, _condition: Condition) -> Result<bool> {
            Ok(self.present.contains(&locator.to_string()))
        }

        fn click(&mut self, locator: &Locator) -> Result<()> {
            let key = locator.to_string();
            if self.opens_window.contains(&key) {
                self.windows += 1;
            }
            self.actions.push(format!("click {}", key));
            Ok(())
        }

        fn type_text(&mut self, locator: &Locator, text: &str) -> Result<()> {
            self.actions.push(format!("type {} {}", locator, text));
            Ok(())
        }

        fn element_html(&mut self, _locator: &Locator) -> Result<String> {
            Ok(self.html.clone())
        }

        fn window_count(&mut self) -> Result<usize> {
            if self.pending_close {
                self.pending_close = false;
                return Ok(self.windows + 1);
            }
            Ok(self.windows)
        }

        fn current_window(&mut self) -> Result<usize> {
            Ok(self.focused)
        }

        fn switch_to_window(&mut self, index: usize) -> Result<()> {
            if index >= self.windows {
                return Err(ScoutError::NoSuchWindow { index });
            }
            self.focused = index;
            self.actions.push(format!("switch {}", index));
            Ok(())
        }

        fn close_window(&mut self) -> Result<()> {
            self.windows -= 1;
            self.pending_close = true;
            self.actions.push(format!("close {}", self.focused));
            Ok(())
        }

        fn quit(&mut self) -> Result<()> {
            self.actions.push("quit".into());
            Ok(())
        }
    }

    fn quick_wait() -> BoundedWait {
        BoundedWait::new(Duration::from_millis(30)).with_poll_interval(Duration::from_millis(5))
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "agent".into(),
            password: "hunter2".into(),
            login_url: "https://portal.example.com/login".into(),
            remine_search: "https://app.remine.com/search".into(),
        }
    }

    #[test]
    fn normalize_address_uppercases_and_trims() {
        assert_eq!(normalize_address("  35-12 82nd st \n").unwrap(), "35-12 82ND ST");
        assert!(matches!(normalize_address("   "), Err(ScoutError::Input { .. })));
    }

    #[test]
    fn full_run_reads_public_records() {
        let sites = SiteMap::remine();
        let mut driver = FakeDriver::with_all_roles(&sites);

        let fields = RemineFlow::new(&mut driver, quick_wait())
            .with_settle_delay(Duration::ZERO)
            .run(&credentials(), "35-12 82ND ST")
            .unwrap();

        assert_eq!(fields.as_slice(), &["Zoning", "R5", "Beds", "2"]);
        assert_eq!(driver.focused, 1);
        assert_eq!(driver.actions[0], "navigate https://portal.example.com/login");
        assert_eq!(driver.actions[1], "type name=loginId agent");
        assert_eq!(driver.actions[2], "type name=password hunter2");
        assert_eq!(driver.actions[3], "click id=btn-login");
        assert!(driver
            .actions
            .contains(&"type id=remine-smarter-search 35-12 82ND ST".to_string()));
    }

    #[test]
    fn extra_portal_window_is_closed() {
        let sites = SiteMap::remine();
        let mut driver = FakeDriver::with_all_roles(&sites);

        RemineFlow::new(&mut driver, quick_wait()).navigate_to_remine().unwrap();

        assert_eq!(driver.windows, 1);
        assert_eq!(driver.focused, 0);
        let tail: Vec<_> = driver.actions.iter().rev().take(3).rev().cloned().collect();
        assert_eq!(tail, vec!["switch 1", "close 1", "switch 0"]);
    }

    /// Chrome's own startup tab sits at index 0 and the portal is driven in
    /// the tab after it.
    fn with_startup_tab(sites: &SiteMap) -> FakeDriver {
        let mut driver = FakeDriver::with_all_roles(sites);
        driver.windows = 2;
        driver.focused = 1;
        driver
    }

    #[test]
    fn popup_is_found_past_startup_tab() {
        let sites = SiteMap::remine();
        let mut driver = with_startup_tab(&sites);

        RemineFlow::new(&mut driver, quick_wait()).navigate_to_remine().unwrap();

        assert_eq!(driver.windows, 2);
        assert_eq!(driver.focused, 1);
        let tail: Vec<_> = driver.actions.iter().rev().take(4).rev().cloned().collect();
        assert_eq!(tail, vec!["click link text=Remine", "switch 2", "close 2", "switch 1"]);
    }

    #[test]
    fn property_tab_is_newest_window() {
        let sites = SiteMap::remine();
        let mut driver = with_startup_tab(&sites);

        let fields = RemineFlow::new(&mut driver, quick_wait())
            .with_settle_delay(Duration::ZERO)
            .run(&credentials(), "35-12 82ND ST")
            .unwrap();

        assert_eq!(fields.len(), 4);
        assert_eq!(driver.windows, 3);
        assert_eq!(driver.focused, 2);
        assert!(driver.actions.contains(&"switch 2".to_string()));
        assert!(!driver.actions.contains(&"close 1".to_string()));
    }

    #[test]
    fn toggle_that_opens_nothing_times_out() {
        let sites = SiteMap::remine();
        let mut driver = with_startup_tab(&sites);
        driver.opens_window.remove(&sites.locator(Role::SelectAllToggle).to_string());

        let err = RemineFlow::new(&mut driver, quick_wait())
            .with_settle_delay(Duration::ZERO)
            .search_property("https://app.remine.com/search", "1 MAIN ST")
            .unwrap_err();

        assert!(matches!(err, ScoutError::Timeout { role: Role::SelectAllToggle, .. }));
        assert_eq!(driver.focused, 1);
    }

    #[test]
    fn missing_element_times_out_with_role() {
        let sites = SiteMap::remine();
        let mut driver = FakeDriver::with_all_roles(&sites);
        driver.present.remove(&sites.locator(Role::SeeAllButton).to_string());

        let err = RemineFlow::new(&mut driver, quick_wait())
            .with_settle_delay(Duration::ZERO)
            .search_property("https://app.remine.com/search", "1 MAIN ST")
            .unwrap_err();

        assert!(matches!(err, ScoutError::Timeout { role: Role::SeeAllButton, .. }));
    }

    #[test]
    fn missing_remine_link_is_not_found() {
        let sites = SiteMap::remine();
        let mut driver = FakeDriver::with_all_roles(&sites);
        driver.present.remove(&sites.locator(Role::RemineLink).to_string());

        let err = RemineFlow::new(&mut driver, quick_wait()).navigate_to_remine().unwrap_err();
        assert!(matches!(err, ScoutError::ElementNotFound { role: Role::RemineLink }));
    }

    #[test]
    fn custom_site_map_is_used() {
        let sites = SiteMap::remine().with(Role::LoginSubmit, Locator::Css("button.sign-in".into()));
        let mut driver = FakeDriver::with_all_roles(&sites);

        RemineFlow::new(&mut driver, quick_wait())
            .with_site_map(sites)
            .login("agent", "hunter2", "https://portal.example.com/login")
            .unwrap();

        assert_eq!(driver.actions.last().unwrap(), "click css=button.sign-in");
    }
}
