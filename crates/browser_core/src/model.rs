use serde::{Deserialize, Serialize};

pub type CompanyId = String;

/// A listed company as reported by the backend. Read-only on the client
/// except for `is_selected`, which only changes through the selection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub ticker_symbol: String,
    pub company_name: String,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub selection_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One page of `GET /companies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyPage {
    pub companies: Vec<Company>,
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

/// Enumerated filter values from `GET /companies/filters`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub exchanges: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<String>,
}

/// Body of `POST /companies/{id}/select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Acknowledgement returned by the selection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionAck {
    pub company_id: CompanyId,
    pub selected: bool,
    #[serde(default)]
    pub selection_date: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// What the view-model needs to know about a failed request.
///
/// `detail` is the server-supplied explanation, when one was sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestFailure {
    pub detail: Option<String>,
}

impl RequestFailure {
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }

    /// Server detail when present and non-empty, otherwise `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.detail.as_deref() {
            Some(detail) if !detail.trim().is_empty() => detail.to_string(),
            _ => fallback.to_string(),
        }
    }
}
