//! `/messages` endpoints.

use reqwest::Method;

use agentdev_models::{Channel, Message};

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{NewChannel, NewMessage};

pub struct MessagesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MessagesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn channels(&self, project_id: Option<&str>) -> Result<Vec<Channel>> {
        let mut request = self.client.request(Method::GET, "messages/channels")?;
        if let Some(project_id) = project_id {
            request = request.query(&[("project_id", project_id)]);
        }
        self.client.execute(request).await
    }

    pub async fn create_channel(&self, channel: &NewChannel) -> Result<Channel> {
        let request = self
            .client
            .request(Method::POST, "messages/channels")?
            .json(channel);
        self.client.execute(request).await
    }

    /// Up to `limit` messages older than `before` (or the latest), oldest first.
    pub async fn messages(
        &self,
        channel_id: &str,
        limit: Option<usize>,
        before: Option<&str>,
    ) -> Result<Vec<Message>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(before) = before {
            query.push(("before", before.to_string()));
        }
        let request = self
            .client
            .request(Method::GET, &format!("messages/{}", channel_id))?
            .query(&query);
        self.client.execute(request).await
    }

    /// Posts a message; agent replies land in the channel history.
    pub async fn send(&self, message: &NewMessage) -> Result<Message> {
        let request = self.client.request(Method::POST, "messages/")?.json(message);
        self.client.execute(request).await
    }
}
