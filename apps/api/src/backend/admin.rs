use serde::{Deserialize, Serialize};

use crate::backend::{BackendClient, BackendError};

/// Back-office settings editable by admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Periodic CRM opportunity sync.
    pub crm_sync_enabled: bool,
    #[serde(default)]
    pub cooptation_bonus_amount: Option<f64>,
    #[serde(default)]
    pub notification_email: Option<String>,
    /// Days before expiry at which partners are reminded about vigilance documents.
    pub vigilance_reminder_days: u32,
}

impl BackendClient {
    /// GET /admin/settings
    pub async fn get_settings(&self) -> Result<AdminSettings, BackendError> {
        self.get("/admin/settings").await
    }

    /// PUT /admin/settings
    pub async fn update_settings(
        &self,
        settings: &AdminSettings,
    ) -> Result<AdminSettings, BackendError> {
        self.put("/admin/settings", settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_settings_round_trips_body() {
        let settings = AdminSettings {
            crm_sync_enabled: true,
            cooptation_bonus_amount: Some(1500.0),
            notification_email: None,
            vigilance_reminder_days: 30,
        };

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/admin/settings")
            .match_body(Matcher::PartialJson(json!({
                "crm_sync_enabled": true,
                "vigilance_reminder_days": 30
            })))
            .with_status(200)
            .with_body(serde_json::to_string(&settings).unwrap())
            .create_async()
            .await;

        let client = BackendClient::new(server.url()).unwrap();
        let saved = client.update_settings(&settings).await.unwrap();

        mock.assert_async().await;
        assert_eq!(saved, settings);
    }
}
