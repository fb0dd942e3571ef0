use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::CrmConfig;
use crate::error::Result;
use crate::models::PropertyRecord;

/// How the receiving system answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    Accepted,
    Rejected { status: u16 },
}

/// Common trait for systems that receive an assembled record
#[async_trait]
pub trait RecordForwarder: Send + Sync {
    /// Submit the record once
    async fn forward(&self, record: &PropertyRecord) -> Result<ForwardOutcome>;

    /// Name of the receiving system
    fn target_name(&self) -> &'static str;
}

/// Posts records as form fields to a Zoho Creator style record-add endpoint
pub struct CreatorForwarder {
    client: Client,
    endpoint: String,
    token: String,
}

impl CreatorForwarder {
    pub fn new(config: &CrmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl RecordForwarder for CreatorForwarder {
    async fn forward(&self, record: &PropertyRecord) -> Result<ForwardOutcome> {
        debug!("POST {} ({} fields)", self.endpoint, record.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .form(record.fields())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(ForwardOutcome::Accepted)
        } else {
            Ok(ForwardOutcome::Rejected {
                status: status.as_u16(),
            })
        }
    }

    fn target_name(&self) -> &'static str {
        "Zoho Creator"
    }
}

/// Forward and report on the console. Failures are logged, never returned,
/// so the caller can still write the table.
pub async fn forward_and_report(forwarder: &dyn RecordForwarder, record: &PropertyRecord) -> bool {
    match forwarder.forward(record).await {
        Ok(ForwardOutcome::Accepted) => {
            info!("✅ Data pushed to {} successfully", forwarder.target_name());
            true
        }
        Ok(ForwardOutcome::Rejected { status }) => {
            warn!("Error pushing data to {} (HTTP {})", forwarder.target_name(), status);
            false
        }
        Err(e) => {
            warn!("Error pushing data to {}: {}", forwarder.target_name(), e);
            false
        }
    }
}

/// Build the CRM forwarder from config and forward once. A client that cannot
/// be built is reported like any other forwarding failure.
pub async fn forward_to_crm(crm: &CrmConfig, record: &PropertyRecord) -> bool {
    match CreatorForwarder::new(crm) {
        Ok(forwarder) => forward_and_report(&forwarder, record).await,
        Err(e) => {
            warn!("Could not set up CRM client, skipping forwarding: {}", e);
            false
        }
    }
}
