use crate::error::Result;
use crate::scrapers::selectors::Locator;
use crate::scrapers::wait::Condition;

/// Browser session capabilities the Remine workflow needs.
/// Windows are indexed in the order they were opened, so the newest window
/// is always `window_count() - 1`. Windows the browser opened at startup
/// count too.
pub trait PageDriver {
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Whether the element exists right now and satisfies `condition`.
    /// A missing element is `Ok(false)`, not an error.
    fn probe(&mut self, locator: &Locator, condition: Condition) -> Result<bool>;

    fn click(&mut self, locator: &Locator) -> Result<()>;

    fn type_text(&mut self, locator: &Locator, text: &str) -> Result<()>;

    /// Outer HTML of the element, including its own tag
    fn element_html(&mut self, locator: &Locator) -> Result<String>;

    fn window_count(&mut self) -> Result<usize>;

    /// Index of the window currently in focus
    fn current_window(&mut self) -> Result<usize>;

    fn switch_to_window(&mut self, index: usize) -> Result<()>;

    /// Close the window currently in focus
    fn close_window(&mut self) -> Result<()>;

    fn quit(&mut self) -> Result<()>;
}
