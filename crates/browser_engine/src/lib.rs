//! Company browser engine: REST client and request execution.
mod client;
mod engine;
mod types;

pub use client::{ApiSettings, CompanyApi, ReqwestCompanyApi, API_KEY_HEADER};
pub use engine::{EngineHandle, SHUTDOWN_GRACE};
pub use types::{ApiError, EngineCommand, EngineEvent, FailureKind, HealthStatus};
