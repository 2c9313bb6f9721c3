// src/domain/camera.rs
use serde::{Deserialize, Serialize};

/// Identificadores fijos de una instancia del servicio (cámara, estante, ROI)
/// y tamaño máximo de la cola de eventos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub camera_id: String,
    pub shelf_id: String,
    pub roi_id: String,
    pub max_events: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            camera_id: "cam_01".into(),
            shelf_id: "est_01".into(),
            roi_id: "roi_01".into(),
            max_events: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Modo de captura pedido al dispositivo. El driver puede ajustarlo al más
/// cercano que soporte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraMode {
    /// FourCC, p. ej. `MJPG` o `YUYV`.
    pub format: String,
    pub size: FrameSize,
    pub fps: f64,
}

/// Frame crudo tal como lo entrega la fuente. El servicio sólo necesita
/// saber que llegó; el contenido queda disponible para futuros detectores.
#[derive(Debug, Clone)]
pub struct Frame {
    pub size: FrameSize,
    pub sequence: u64,
    pub data: Vec<u8>,
}

/// Traduce el identificador de fuente a una ruta de dispositivo:
/// un índice numérico (`"0"`) se convierte en `/dev/video0`, cualquier otra
/// cosa (ruta o URL) se usa tal cual.
pub fn source_path(source: &str) -> String {
    let trimmed = source.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("/dev/video{}", trimmed)
    } else {
        trimmed.to_string()
    }
}
