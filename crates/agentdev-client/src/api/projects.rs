//! `/projects` endpoints.

use reqwest::Method;

use agentdev_models::{Project, ProjectPatch, ProjectStats, ProjectStatus};

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{NewProject, ProjectPage};

pub struct ProjectsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProjectsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        status: Option<ProjectStatus>,
        page: usize,
        page_size: usize,
    ) -> Result<ProjectPage> {
        let mut query = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let request = self.client.request(Method::GET, "projects/")?.query(&query);
        self.client.execute(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Project> {
        let request = self.client.request(Method::GET, &format!("projects/{}", id))?;
        self.client.execute(request).await
    }

    pub async fn create(&self, project: &NewProject) -> Result<Project> {
        let request = self.client.request(Method::POST, "projects/")?.json(project);
        self.client.execute(request).await
    }

    pub async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<Project> {
        let request = self
            .client
            .request(Method::PUT, &format!("projects/{}", id))?
            .json(patch);
        self.client.execute(request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let request = self
            .client
            .request(Method::DELETE, &format!("projects/{}", id))?;
        self.client.execute_empty(request).await
    }

    pub async fn start(&self, id: &str) -> Result<Project> {
        let request = self
            .client
            .request(Method::POST, &format!("projects/{}/start", id))?;
        self.client.execute(request).await
    }

    pub async fn complete(&self, id: &str) -> Result<Project> {
        let request = self
            .client
            .request(Method::POST, &format!("projects/{}/complete", id))?;
        self.client.execute(request).await
    }

    pub async fn stats(&self) -> Result<ProjectStats> {
        let request = self.client.request(Method::GET, "projects/stats/summary")?;
        self.client.execute(request).await
    }
}
