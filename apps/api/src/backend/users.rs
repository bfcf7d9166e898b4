use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Commercial,
    Rh,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Serialize)]
struct RoleUpdate {
    role: Role,
}

impl BackendClient {
    /// GET /users
    pub async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        self.get("/users").await
    }

    /// GET /users/me
    pub async fn current_user(&self) -> Result<User, BackendError> {
        self.get("/users/me").await
    }

    /// PATCH /users/:id/role
    pub async fn update_user_role(&self, id: Uuid, role: Role) -> Result<User, BackendError> {
        self.patch(&format!("/users/{id}/role"), &RoleUpdate { role })
            .await
    }

    /// POST /users/:id/deactivate
    pub async fn deactivate_user(&self, id: Uuid) -> Result<User, BackendError> {
        self.post(&format!("/users/{id}/deactivate"), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_user_role() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/users/11111111-2222-4333-8444-555555555555/role")
            .match_body(Matcher::Json(json!({ "role": "rh" })))
            .with_status(200)
            .with_body(
                json!({
                    "id": "11111111-2222-4333-8444-555555555555",
                    "email": "camille@example.com",
                    "first_name": "Camille",
                    "last_name": "Bernard",
                    "role": "rh",
                    "created_at": "2023-09-01T08:00:00Z"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = BackendClient::new(server.url()).unwrap();
        let id: Uuid = "11111111-2222-4333-8444-555555555555".parse().unwrap();
        let user = client.update_user_role(id, Role::Rh).await.unwrap();

        mock.assert_async().await;
        assert_eq!(user.role, Role::Rh);
        assert!(user.is_active);
        assert_eq!(user.full_name(), "Camille Bernard");
        assert!(!user.is_admin());
    }
}
