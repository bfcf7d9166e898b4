//! Partner portal. Partners authenticate with an emailed access token rather
//! than a user session, so these calls carry the token in `X-Portal-Token`.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::vigilance::VigilanceDocument;
use crate::backend::{execute, BackendClient, BackendError};

const PORTAL_TOKEN_HEADER: &str = "X-Portal-Token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalProfile {
    pub partner_id: Uuid,
    pub company_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub siret: Option<String>,
}

impl BackendClient {
    /// GET /portal/profile
    pub async fn portal_profile(&self, token: &str) -> Result<PortalProfile, BackendError> {
        execute(
            self.request(Method::GET, "/portal/profile")
                .header(PORTAL_TOKEN_HEADER, token),
        )
        .await
    }

    /// GET /portal/documents
    pub async fn portal_documents(
        &self,
        token: &str,
    ) -> Result<Vec<VigilanceDocument>, BackendError> {
        execute(
            self.request(Method::GET, "/portal/documents")
                .header(PORTAL_TOKEN_HEADER, token),
        )
        .await
    }
}
