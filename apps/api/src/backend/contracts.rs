//! Contract requests raised for a consultant placement.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError, Page, StatusChange, StatusUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    Signed,
    Cancelled,
}

impl ContractStatus {
    pub fn allowed_transitions(&self) -> &'static [ContractStatus] {
        use ContractStatus::*;
        match self {
            Draft => &[Submitted, Cancelled],
            Submitted => &[UnderReview, Cancelled],
            UnderReview => &[Approved, Rejected],
            Approved => &[Signed, Cancelled],
            Rejected => &[Draft],
            Signed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub id: Uuid,
    pub reference: String,
    pub consultant_name: String,
    pub client_name: String,
    #[serde(default)]
    pub opportunity_id: Option<Uuid>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Daily rate in euros.
    #[serde(default)]
    pub daily_rate: Option<f64>,
    pub status: ContractStatus,
    #[serde(default)]
    pub status_history: Vec<StatusChange<ContractStatus>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContractRequest {
    pub consultant_name: String,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<Uuid>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
}

#[derive(Serialize)]
struct StatusQuery {
    status: ContractStatus,
}

impl BackendClient {
    /// GET /contract-requests
    pub async fn list_contract_requests(
        &self,
        status: Option<ContractStatus>,
    ) -> Result<Page<ContractRequest>, BackendError> {
        match status {
            Some(status) => {
                self.get_query("/contract-requests", &StatusQuery { status })
                    .await
            }
            None => self.get("/contract-requests").await,
        }
    }

    /// GET /contract-requests/:id
    pub async fn get_contract_request(&self, id: Uuid) -> Result<ContractRequest, BackendError> {
        self.get(&format!("/contract-requests/{id}")).await
    }

    /// POST /contract-requests
    pub async fn create_contract_request(
        &self,
        new: &NewContractRequest,
    ) -> Result<ContractRequest, BackendError> {
        self.post("/contract-requests", new).await
    }

    /// PATCH /contract-requests/:id/status
    pub async fn update_contract_status(
        &self,
        id: Uuid,
        status: ContractStatus,
        comment: Option<&str>,
    ) -> Result<ContractRequest, BackendError> {
        self.patch(
            &format!("/contract-requests/{id}/status"),
            &StatusUpdate { status, comment },
        )
        .await
    }
}
