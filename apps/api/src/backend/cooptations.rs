//! Cooptations: employee referrals of candidates, optionally against a
//! published opportunity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError, Page, StatusChange, StatusUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooptationStatus {
    Pending,
    InReview,
    InterviewScheduled,
    Accepted,
    Rejected,
}

impl CooptationStatus {
    /// Statuses a reviewer may move a cooptation to from `self`.
    pub fn allowed_transitions(&self) -> &'static [CooptationStatus] {
        use CooptationStatus::*;
        match self {
            Pending => &[InReview, Rejected],
            InReview => &[InterviewScheduled, Accepted, Rejected],
            InterviewScheduled => &[Accepted, Rejected],
            Accepted | Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, next: CooptationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_final(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooptation {
    pub id: Uuid,
    pub candidate_first_name: String,
    pub candidate_last_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub candidate_phone: Option<String>,
    #[serde(default)]
    pub opportunity_id: Option<Uuid>,
    #[serde(default)]
    pub opportunity_title: Option<String>,
    pub submitter_id: Uuid,
    #[serde(default)]
    pub submitter_name: Option<String>,
    pub status: CooptationStatus,
    #[serde(default)]
    pub status_history: Vec<StatusChange<CooptationStatus>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cooptation {
    pub fn candidate_name(&self) -> String {
        format!("{} {}", self.candidate_first_name, self.candidate_last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CooptationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CooptationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCooptation {
    pub candidate_first_name: String,
    pub candidate_last_name: String,
    pub candidate_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl BackendClient {
    /// GET /cooptations
    pub async fn list_cooptations(
        &self,
        filter: &CooptationFilter,
    ) -> Result<Page<Cooptation>, BackendError> {
        self.get_query("/cooptations", filter).await
    }

    /// GET /cooptations/:id
    pub async fn get_cooptation(&self, id: Uuid) -> Result<Cooptation, BackendError> {
        self.get(&format!("/cooptations/{id}")).await
    }

    /// POST /cooptations
    pub async fn create_cooptation(&self, new: &NewCooptation) -> Result<Cooptation, BackendError> {
        self.post("/cooptations", new).await
    }

    /// PATCH /cooptations/:id/status
    pub async fn update_cooptation_status(
        &self,
        id: Uuid,
        status: CooptationStatus,
        comment: Option<&str>,
    ) -> Result<Cooptation, BackendError> {
        self.patch(
            &format!("/cooptations/{id}/status"),
            &StatusUpdate { status, comment },
        )
        .await
    }
}
