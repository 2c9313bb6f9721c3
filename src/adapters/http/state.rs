use std::sync::Arc;
use std::time::Duration;

use crate::application::pick_service::PickEventService;

/// Estado compartido para los manejadores HTTP de Axum.
#[derive(Clone)]
pub struct HttpState {
    /// `None` si el servicio no pudo construirse (sin backend de captura).
    pub pick: Option<Arc<PickEventService>>,
    /// Espera máxima de `POST /api/pick/stop`.
    pub stop_timeout: Duration,
}
