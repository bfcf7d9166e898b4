//! Vigilance: compliance documents partners must keep current
//! (Kbis extract, URSSAF and tax certificates, insurance).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VigilanceStatus {
    Requested,
    Uploaded,
    Validated,
    Rejected,
    Expired,
}

impl VigilanceStatus {
    pub fn allowed_transitions(&self) -> &'static [VigilanceStatus] {
        use VigilanceStatus::*;
        match self {
            Requested => &[Uploaded, Expired],
            Uploaded => &[Validated, Rejected],
            Validated => &[Expired],
            Rejected | Expired => &[Requested],
        }
    }

    pub fn can_transition_to(&self, next: VigilanceStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Kbis,
    UrssafCertificate,
    TaxCertificate,
    Insurance,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilanceDocument {
    pub id: Uuid,
    pub partner_id: Uuid,
    #[serde(default)]
    pub partner_name: Option<String>,
    pub document_type: DocumentType,
    pub status: VigilanceStatus,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl VigilanceDocument {
    /// True when the document is marked expired or its expiry date has passed.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.status == VigilanceStatus::Expired
            || matches!(self.expires_at, Some(expiry) if expiry < today)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentRequest {
    pub partner_id: Uuid,
    pub document_type: DocumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Validate,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(&self) -> VigilanceStatus {
        match self {
            ReviewDecision::Validate => VigilanceStatus::Validated,
            ReviewDecision::Reject => VigilanceStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReview {
    pub decision: ReviewDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
}

#[derive(Serialize)]
struct PartnerQuery {
    partner_id: Uuid,
}

impl BackendClient {
    /// GET /vigilance/documents
    pub async fn list_vigilance_documents(
        &self,
        partner_id: Option<Uuid>,
    ) -> Result<Vec<VigilanceDocument>, BackendError> {
        match partner_id {
            Some(partner_id) => {
                self.get_query("/vigilance/documents", &PartnerQuery { partner_id })
                    .await
            }
            None => self.get("/vigilance/documents").await,
        }
    }

    /// POST /vigilance/documents
    pub async fn request_vigilance_document(
        &self,
        request: &DocumentRequest,
    ) -> Result<VigilanceDocument, BackendError> {
        self.post("/vigilance/documents", request).await
    }

    /// POST /vigilance/documents/:id/review
    pub async fn review_vigilance_document(
        &self,
        id: Uuid,
        review: &DocumentReview,
    ) -> Result<VigilanceDocument, BackendError> {
        self.post(&format!("/vigilance/documents/{id}/review"), review)
            .await
    }
}
