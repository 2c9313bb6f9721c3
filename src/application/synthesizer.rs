use std::time::{Duration, Instant};

use serde_json::{json, Map};

use crate::application::ports::{EventSynthesizer, SynthesizerFactory, Tick};
use crate::domain::{
    acquisition::AcquisitionSettings,
    camera::ServiceConfig,
    event::{ConfirmationMethod, PickEvent},
};

const DEMO_CONFIDENCE: f32 = 0.5;

/// Genera un PICK sintético cada `interval`, de forma recurrente.
/// Sirve para probar el tablero sin un detector real.
pub struct DemoSynthesizer {
    config: ServiceConfig,
    sku: String,
    track: u64,
    fps: f64,
    interval: Duration,
    last_emit: Instant,
}

impl DemoSynthesizer {
    pub fn new(config: ServiceConfig, settings: &AcquisitionSettings, started: Instant) -> Self {
        Self {
            config,
            sku: settings.demo_sku.clone(),
            track: settings.demo_track,
            fps: settings.mode.fps,
            interval: settings.demo_interval,
            last_emit: started,
        }
    }
}

impl EventSynthesizer for DemoSynthesizer {
    fn on_frame(&mut self, tick: &Tick) -> Option<PickEvent> {
        if tick.now.saturating_duration_since(self.last_emit) < self.interval {
            return None;
        }
        self.last_emit = tick.now;

        let mut evidence = Map::new();
        evidence.insert("fps".into(), json!(self.fps));
        evidence.insert("fps_est".into(), json!(tick.fps_est));

        Some(PickEvent::pick(
            &self.config,
            self.sku.clone(),
            self.track,
            DEMO_CONFIDENCE,
            ConfirmationMethod::Demo,
            evidence,
        ))
    }
}

/// Activa el [`DemoSynthesizer`] sólo si `demo_enabled`.
pub struct DemoSynthesizerFactory;

impl SynthesizerFactory for DemoSynthesizerFactory {
    fn build(
        &self,
        config: &ServiceConfig,
        settings: &AcquisitionSettings,
    ) -> Option<Box<dyn EventSynthesizer>> {
        if !settings.demo_enabled {
            return None;
        }
        Some(Box::new(DemoSynthesizer::new(config.clone(), settings, Instant::now())))
    }
}
