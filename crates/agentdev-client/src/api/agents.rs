//! `/agents` endpoints.

use reqwest::Method;

use agentdev_models::Agent;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::NewAgent;

pub struct AgentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AgentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Agents serving `project_id` plus global agents, or every agent.
    pub async fn list(&self, project_id: Option<&str>) -> Result<Vec<Agent>> {
        let mut request = self.client.request(Method::GET, "agents/")?;
        if let Some(project_id) = project_id {
            request = request.query(&[("project_id", project_id)]);
        }
        self.client.execute(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Agent> {
        let request = self.client.request(Method::GET, &format!("agents/{}", id))?;
        self.client.execute(request).await
    }

    pub async fn create(&self, agent: &NewAgent) -> Result<Agent> {
        let request = self.client.request(Method::POST, "agents/")?.json(agent);
        self.client.execute(request).await
    }
}
