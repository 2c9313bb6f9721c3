use std::time::Instant;

use crate::domain::{
    acquisition::AcquisitionSettings,
    camera::{Frame, ServiceConfig},
    errors::DomainResult,
    event::PickEvent,
};

/// Fuente de frames (cámara, stream, archivo).
pub trait FrameSourcePort: Send + Sync {
    /// Abre la fuente. Un error aquí es fatal para la corrida actual.
    fn open(&self, source: &str) -> DomainResult<Box<dyn FrameReader>>;
}

/// Handle abierto sobre una fuente. Se libera al hacer drop.
pub trait FrameReader: Send {
    /// `Ok(None)` es un frame perdido (transitorio); `Err` termina la corrida.
    fn read_frame(&mut self) -> DomainResult<Option<Frame>>;
}

/// Datos de la iteración actual que recibe el sintetizador.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub now: Instant,
    /// FPS medido (media móvil exponencial).
    pub fps_est: f32,
}

/// Política que puede generar eventos una vez por iteración del bucle.
pub trait EventSynthesizer: Send {
    fn on_frame(&mut self, tick: &Tick) -> Option<PickEvent>;
}

/// Construye el sintetizador de cada corrida. `None` lo desactiva.
pub trait SynthesizerFactory: Send + Sync {
    fn build(
        &self,
        config: &ServiceConfig,
        settings: &AcquisitionSettings,
    ) -> Option<Box<dyn EventSynthesizer>>;
}
