//! `/artifacts` endpoints.

use reqwest::Method;

use agentdev_models::Artifact;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::NewArtifact;

pub struct ArtifactsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ArtifactsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        project_id: Option<&str>,
        artifact_type: Option<&str>,
    ) -> Result<Vec<Artifact>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(project_id) = project_id {
            query.push(("project_id", project_id));
        }
        if let Some(artifact_type) = artifact_type {
            query.push(("artifact_type", artifact_type));
        }
        let request = self.client.request(Method::GET, "artifacts/")?.query(&query);
        self.client.execute(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Artifact> {
        let request = self
            .client
            .request(Method::GET, &format!("artifacts/{}", id))?;
        self.client.execute(request).await
    }

    pub async fn create(&self, artifact: &NewArtifact) -> Result<Artifact> {
        let request = self.client.request(Method::POST, "artifacts/")?.json(artifact);
        self.client.execute(request).await
    }
}
