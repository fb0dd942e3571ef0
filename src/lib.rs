pub mod assembler;
pub mod config;
pub mod error;
pub mod forward;
pub mod logger;
pub mod models;
pub mod scrapers;

pub use config::{CliArgs, Config, CrmConfig};
pub use error::{RecordError, Result, ScoutError};
pub use forward::{CreatorForwarder, ForwardOutcome, RecordForwarder};
pub use models::{PropertyRecord, ScrapedFields};
