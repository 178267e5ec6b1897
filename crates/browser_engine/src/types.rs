use std::fmt;

use browser_core::{
    Company, CompanyId, CompanyPage, CompanyQuery, Effect, FilterOptions, Msg, RequestFailure, RequestId, SelectionAck,
};
use serde::Deserialize;
use thiserror::Error;

/// Work the engine can perform on behalf of the view-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    LoadCompanies {
        request_id: RequestId,
        query: CompanyQuery,
    },
    LoadFilterOptions,
    SelectCompany {
        company_id: CompanyId,
        selected: bool,
    },
    FetchCompany {
        company_id: CompanyId,
    },
    LoadSelected,
    CheckHealth,
}

impl From<Effect> for EngineCommand {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::LoadCompanies { request_id, query } => {
                EngineCommand::LoadCompanies { request_id, query }
            }
            Effect::LoadFilterOptions => EngineCommand::LoadFilterOptions,
            Effect::SelectCompany {
                company_id,
                selected,
            } => EngineCommand::SelectCompany {
                company_id,
                selected,
            },
        }
    }
}

/// Completion of an [`EngineCommand`], delivered in completion order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CompaniesLoaded {
        request_id: RequestId,
        result: Result<CompanyPage, ApiError>,
    },
    FilterOptionsLoaded {
        result: Result<FilterOptions, ApiError>,
    },
    SelectionCompleted {
        company_id: CompanyId,
        result: Result<SelectionAck, ApiError>,
    },
    CompanyFetched {
        company_id: CompanyId,
        result: Result<Company, ApiError>,
    },
    SelectedLoaded {
        result: Result<Vec<Company>, ApiError>,
    },
    HealthChecked {
        result: Result<HealthStatus, ApiError>,
    },
}

impl EngineEvent {
    /// Converts the completion into the view-model message it answers.
    /// Lookups that the view-model does not track yield `None`.
    pub fn into_msg(self) -> Option<Msg> {
        let msg = match self {
            EngineEvent::CompaniesLoaded { request_id, result } => Msg::CompaniesLoaded {
                request_id,
                result: result.map_err(|err| err.to_failure()),
            },
            EngineEvent::FilterOptionsLoaded { result } => {
                Msg::FilterOptionsLoaded(result.map_err(|err| err.to_failure()))
            }
            EngineEvent::SelectionCompleted { company_id, result } => Msg::SelectionCompleted {
                company_id,
                result: result.map_err(|err| err.to_failure()),
            },
            EngineEvent::CompanyFetched { .. }
            | EngineEvent::SelectedLoaded { .. }
            | EngineEvent::HealthChecked { .. } => return None,
        };
        Some(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// `detail` from a non-2xx JSON body, when the server sent a string one.
    pub detail: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// Reduces the error to what the view-model shows the user.
    pub fn to_failure(&self) -> RequestFailure {
        RequestFailure {
            detail: self.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidSettings,
    Network,
    Timeout,
    HttpStatus(u16),
    Encode,
    Decode,
}

impl FailureKind {
    /// True when no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, FailureKind::Network | FailureKind::Timeout)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidSettings => write!(f, "invalid settings"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Encode => write!(f, "request encoding failed"),
            FailureKind::Decode => write!(f, "invalid response body"),
        }
    }
}
