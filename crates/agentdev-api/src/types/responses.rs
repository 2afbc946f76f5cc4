//! Response DTOs for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agentdev_models::{Project, User};

use crate::auth::TokenPair;

/// `GET /` service banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub status: String,
}

/// Health of the backing services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthServices {
    pub storage: String,
    pub api: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub services: HealthServices,
}

/// Tokens plus the user they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user_info: User,
}

impl LoginResponse {
    pub fn new(tokens: TokenPair, user: User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "bearer".to_string(),
            expires_in: tokens.expires_in,
            user_info: user,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    /// Matching projects across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
}

impl ProjectListResponse {
    /// Slices `page` (1-based) out of the already filtered and ordered `projects`.
    pub fn paginate(projects: Vec<Project>, page: usize, page_size: usize) -> Self {
        let total = projects.len();
        let start = (page - 1).saturating_mul(page_size);
        let projects: Vec<Project> = projects.into_iter().skip(start).take(page_size).collect();
        let has_next = start.saturating_add(projects.len()) < total;
        Self {
            projects,
            total,
            page,
            page_size,
            has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(n: usize) -> Vec<Project> {
        (0..n)
            .map(|i| Project::new(format!("p{}", i), "user_123"))
            .collect()
    }

    #[test]
    fn test_paginate_first_page() {
        let page = ProjectListResponse::paginate(projects(5), 1, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.projects.len(), 2);
        assert_eq!(page.projects[0].name, "p0");
        assert!(page.has_next);
    }

    #[test]
    fn test_paginate_last_page() {
        let page = ProjectListResponse::paginate(projects(5), 3, 2);
        assert_eq!(page.projects.len(), 1);
        assert_eq!(page.projects[0].name, "p4");
        assert!(!page.has_next);
    }

    #[test]
    fn test_paginate_past_end() {
        let page = ProjectListResponse::paginate(projects(3), 4, 2);
        assert!(page.projects.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn test_login_response_token_type() {
        let tokens = TokenPair {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_in: 1800,
        };
        let user = User::new("user_123", "admin@example.com", "Admin User", Default::default());
        let json = serde_json::to_value(LoginResponse::new(tokens, user)).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["user_info"]["user_id"], "user_123");
        assert_eq!(json["expires_in"], 1800);
    }
}
