use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::camera::{CameraMode, FrameSize};

/// Parámetros del bucle de adquisición. Cada corrida del worker trabaja
/// sobre su propia copia.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AcquisitionSettings {
    /// Índice de cámara (`"0"`), ruta de dispositivo o URL.
    pub source: String,
    pub mode: CameraMode,
    pub heartbeat_period: Duration,
    /// Espera tras un frame perdido.
    pub read_backoff: Duration,
    pub demo_enabled: bool,
    pub demo_interval: Duration,
    pub demo_sku: String,
    pub demo_track: u64,
}

impl AcquisitionSettings {
    /// Periodo objetivo de cada iteración (`1/fps`, con fps mínimo 1).
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.mode.fps.max(1.0))
    }
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            source: "0".into(),
            mode: CameraMode {
                format: "MJPG".into(),
                size: FrameSize { width: 640, height: 480 },
                fps: 30.0,
            },
            heartbeat_period: Duration::from_secs(2),
            read_backoff: Duration::from_millis(50),
            demo_enabled: true,
            demo_interval: Duration::from_secs(8),
            demo_sku: "SKU_DEMO".into(),
            demo_track: 1,
        }
    }
}
