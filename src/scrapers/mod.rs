pub mod browser;
pub mod extract;
pub mod remine;
pub mod selectors;
pub mod traits;
pub mod wait;

pub use browser::ChromeDriver;
pub use remine::{normalize_address, Credentials, RemineFlow};
pub use selectors::{Locator, Role, SiteMap};
pub use traits::PageDriver;
pub use wait::{BoundedWait, Condition, WaitOutcome};
