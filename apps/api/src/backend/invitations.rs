use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::users::Role;
use crate::backend::{BackendClient, BackendError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub invited_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Not yet accepted and not yet expired at `now`.
    pub fn is_pending(&self, now: DateTime<Utc>) -> bool {
        self.accepted_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInvitation {
    pub email: String,
    pub role: Role,
}

impl BackendClient {
    /// GET /invitations
    pub async fn list_invitations(&self) -> Result<Vec<Invitation>, BackendError> {
        self.get("/invitations").await
    }

    /// POST /invitations
    pub async fn create_invitation(
        &self,
        invitation: &NewInvitation,
    ) -> Result<Invitation, BackendError> {
        self.post("/invitations", invitation).await
    }

    /// DELETE /invitations/:id
    pub async fn revoke_invitation(&self, id: Uuid) -> Result<(), BackendError> {
        self.delete(&format!("/invitations/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_invitation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/invitations")
            .match_body(Matcher::Json(json!({
                "email": "new.hire@example.com",
                "role": "commercial"
            })))
            .with_status(201)
            .with_body(
                json!({
                    "id": "22222222-3333-4444-8555-666666666666",
                    "email": "new.hire@example.com",
                    "role": "commercial",
                    "expires_at": "2024-07-08T00:00:00Z",
                    "created_at": "2024-07-01T00:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = BackendClient::new(server.url()).unwrap();
        let invitation = client
            .create_invitation(&NewInvitation {
                email: "new.hire@example.com".to_string(),
                role: Role::Commercial,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        let before_expiry = Utc.with_ymd_and_hms(2024, 7, 5, 12, 0, 0).unwrap();
        let after_expiry = Utc.with_ymd_and_hms(2024, 7, 9, 0, 0, 0).unwrap();
        assert!(invitation.is_pending(before_expiry));
        assert!(!invitation.is_pending(after_expiry));
    }
}
