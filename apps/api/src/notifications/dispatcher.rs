use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::notifications::models::DispatchRequest;
use crate::notifications::DispatchError;

/// External collaborator that actually delivers the message (email, SMS, ...).
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<(), DispatchError>;
}

/// Posts the dispatch request as JSON to a configured webhook.
#[derive(Clone)]
pub struct WebhookDispatcher {
    client: Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: String) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<(), DispatchError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Notification webhook accepted {} request", request.category);
        Ok(())
    }
}
