use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServicePhase {
    Idle,
    Running,
    /// Detenido por un error interno; sólo `start` lo saca de aquí.
    Faulted,
}

impl ServicePhase {
    pub fn from_flags(running: bool, last_error: Option<&str>) -> Self {
        match (running, last_error) {
            (true, _) => ServicePhase::Running,
            (false, Some(_)) => ServicePhase::Faulted,
            (false, None) => ServicePhase::Idle,
        }
    }
}

/// Foto del estado del servicio tomada bajo una sola adquisición del lock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub running: bool,
    pub phase: ServicePhase,
    pub camera_id: String,
    #[serde(rename = "estante_id")]
    pub shelf_id: String,
    pub roi_id: String,
    pub queued_events: usize,
    pub max_events: usize,
    /// Eventos descartados por cola llena desde que se creó el servicio.
    pub dropped_events: u64,
    pub last_error: Option<String>,
    pub last_heartbeat_ms: Option<i64>,
}
