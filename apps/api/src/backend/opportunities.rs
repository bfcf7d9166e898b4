//! Opportunities: raw CRM (BoondManager) records and the subset published
//! internally for cooptation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};

/// An opportunity as mirrored from the CRM. Ids are CRM-side strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmOpportunity {
    pub id: String,
    pub reference: String,
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    /// Set once the opportunity has been published internally.
    #[serde(default)]
    pub published_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedOpportunity {
    pub id: Uuid,
    #[serde(default)]
    pub crm_id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cooptation_count: u32,
}

impl PublishedOpportunity {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishOpportunity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crm_id: Option<String>,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    search: &'a str,
}

impl BackendClient {
    /// GET /opportunities/crm
    pub async fn list_crm_opportunities(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<CrmOpportunity>, BackendError> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(search) => {
                self.get_query("/opportunities/crm", &SearchQuery { search })
                    .await
            }
            None => self.get("/opportunities/crm").await,
        }
    }

    /// GET /opportunities/published
    pub async fn list_published_opportunities(
        &self,
    ) -> Result<Vec<PublishedOpportunity>, BackendError> {
        self.get("/opportunities/published").await
    }

    /// POST /opportunities/published
    pub async fn publish_opportunity(
        &self,
        publish: &PublishOpportunity,
    ) -> Result<PublishedOpportunity, BackendError> {
        self.post("/opportunities/published", publish).await
    }

    /// POST /opportunities/published/:id/close
    pub async fn close_published_opportunity(
        &self,
        id: Uuid,
    ) -> Result<PublishedOpportunity, BackendError> {
        self.post(
            &format!("/opportunities/published/{id}/close"),
            &serde_json::json!({}),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_crm_search_is_trimmed_and_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/opportunities/crm")
            .match_query(Matcher::UrlEncoded("search".into(), "rust dev".into()))
            .with_status(200)
            .with_body(
                json!([{
                    "id": "AO-1542",
                    "reference": "AO-1542",
                    "title": "Développeur Rust",
                    "client_name": "Acme",
                    "start_date": "2024-06-03"
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let client = BackendClient::new(server.url()).unwrap();
        let found = client
            .list_crm_opportunities(Some("  rust dev "))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(found.len(), 1);
        assert!(found[0].published_id.is_none());
    }

    #[tokio::test]
    async fn test_close_published_opportunity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/opportunities/published/11111111-2222-4333-8444-555555555555/close",
            )
            .with_status(200)
            .with_body(
                json!({
                    "id": "11111111-2222-4333-8444-555555555555",
                    "title": "Développeur Rust",
                    "description": "Mission longue",
                    "skills": ["Rust", "Tokio"],
                    "published_at": "2024-05-01T08:00:00Z",
                    "closed_at": "2024-06-01T08:00:00Z",
                    "cooptation_count": 3
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = BackendClient::new(server.url()).unwrap();
        let id: Uuid = "11111111-2222-4333-8444-555555555555".parse().unwrap();
        let closed = client.close_published_opportunity(id).await.unwrap();

        mock.assert_async().await;
        assert!(!closed.is_open());
        assert_eq!(closed.cooptation_count, 3);
    }
}
