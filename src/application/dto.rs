use serde::{Deserialize, Serialize};

use crate::domain::{event::PickEvent, status::ServiceStatus};

/// Límite por defecto de `GET /api/pick/events`.
pub const DEFAULT_EVENTS_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: ServiceStatus,
}

impl From<ServiceStatus> for StatusResponse {
    fn from(status: ServiceStatus) -> Self {
        Self { success: true, status }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub success: bool,
    pub events: Vec<PickEvent>,
}

impl From<Vec<PickEvent>> for EventsResponse {
    fn from(events: Vec<PickEvent>) -> Self {
        Self { success: true, events }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Query de `GET /api/pick/events`. El límite llega como texto para poder
/// caer al valor por defecto si no es un entero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<String>,
}

impl EventsQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_EVENTS_LIMIT)
    }
}
