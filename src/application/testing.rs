//! Fuentes de frames en memoria para los tests del servicio.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::application::ports::{FrameReader, FrameSourcePort};
use crate::domain::{
    acquisition::AcquisitionSettings,
    camera::{CameraMode, Frame, FrameSize},
    errors::{DomainError, DomainResult},
};

#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Siempre entrega un frame.
    Frames,
    /// Alterna frame y frame perdido.
    MissEveryOther,
    /// Tarda `delay` y luego falla al abrir.
    FailOpen { delay: Duration },
    /// Entrega `n` frames y luego devuelve un error de captura.
    FailReadAfter(u64),
    /// Entrega `n` frames y luego entra en panic.
    PanicAfter(u64),
    /// Cada lectura bloquea el tiempo indicado.
    SlowRead(Duration),
}

#[derive(Clone)]
pub struct ScriptedSource {
    script: Script,
    opens: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            opens: Arc::new(AtomicUsize::new(0)),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl FrameSourcePort for ScriptedSource {
    fn open(&self, source: &str) -> DomainResult<Box<dyn FrameReader>> {
        if let Script::FailOpen { delay } = self.script {
            thread::sleep(delay);
            return Err(DomainError::SourceOpen {
                source_id: source.to_string(),
                reason: "device busy".into(),
            });
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedReader {
            script: self.script,
            reads: 0,
            releases: self.releases.clone(),
        }))
    }
}

struct ScriptedReader {
    script: Script,
    reads: u64,
    releases: Arc<AtomicUsize>,
}

impl FrameReader for ScriptedReader {
    fn read_frame(&mut self) -> DomainResult<Option<Frame>> {
        self.reads += 1;
        let frame = Frame {
            size: FrameSize { width: 4, height: 2 },
            sequence: self.reads,
            data: vec![0; 8],
        };
        match self.script {
            Script::Frames | Script::FailOpen { .. } => Ok(Some(frame)),
            Script::MissEveryOther => Ok((self.reads % 2 == 0).then_some(frame)),
            Script::FailReadAfter(n) if self.reads > n => {
                Err(DomainError::Capture("cable unplugged".into()))
            }
            Script::PanicAfter(n) if self.reads > n => panic!("sensor exploded"),
            Script::FailReadAfter(_) | Script::PanicAfter(_) => Ok(Some(frame)),
            Script::SlowRead(d) => {
                thread::sleep(d);
                Ok(Some(frame))
            }
        }
    }
}

impl Drop for ScriptedReader {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Ajustes con intervalos cortos para que los tests corran rápido.
pub fn fast_settings() -> AcquisitionSettings {
    AcquisitionSettings {
        source: "test-cam".into(),
        mode: CameraMode {
            format: "MJPG".into(),
            size: FrameSize { width: 4, height: 2 },
            fps: 500.0,
        },
        heartbeat_period: Duration::from_millis(5),
        read_backoff: Duration::from_millis(1),
        demo_enabled: true,
        demo_interval: Duration::from_millis(10),
        demo_sku: "SKU_TEST".into(),
        demo_track: 3,
    }
}

/// Sondea `cond` hasta que se cumpla o venza `timeout`.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}
