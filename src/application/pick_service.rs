use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, error, info, warn};

use crate::application::ports::{FrameSourcePort, SynthesizerFactory};
use crate::application::synthesizer::DemoSynthesizerFactory;
use crate::application::worker::{self, StopSignal, WorkerContext};
use crate::domain::{
    acquisition::AcquisitionSettings,
    camera::ServiceConfig,
    event::PickEvent,
    queue::EventQueue,
    status::{ServicePhase, ServiceStatus},
};

/// Control de la corrida activa: la señal de parada y el canal que se
/// desconecta cuando el worker termina.
struct RunControl {
    stop: StopSignal,
    done: Receiver<()>,
}

struct ServiceState {
    running: bool,
    /// Se incrementa en cada `start` efectivo. Un worker sólo escribe si
    /// su generación sigue siendo la actual.
    generation: u64,
    last_error: Option<String>,
    last_heartbeat_ms: Option<i64>,
    queue: EventQueue,
    run: Option<RunControl>,
}

/// Estado compartido entre el worker y los llamadores, detrás de un único lock.
pub(crate) struct Shared {
    state: Mutex<ServiceState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn record_heartbeat(&self, generation: u64, ts_ms: i64) {
        let mut st = self.lock();
        if st.generation == generation {
            st.last_heartbeat_ms = Some(ts_ms);
        }
    }

    /// Encola un evento del worker si su corrida sigue vigente.
    pub(crate) fn emit_from_run(&self, generation: u64, event: PickEvent) {
        let pushed = {
            let mut st = self.lock();
            if !st.running || st.generation != generation {
                return;
            }
            push_counted(&mut st.queue, event)
        };
        log_eviction(pushed);
    }

    pub(crate) fn finish_run(&self, generation: u64, failure: Option<String>) {
        let mut st = self.lock();
        if st.generation != generation {
            return;
        }
        st.running = false;
        st.run = None;
        if failure.is_some() {
            st.last_error = failure;
        }
    }
}

/// Encola y devuelve el evento desalojado junto al total de descartes,
/// ambos leídos bajo el mismo lock.
fn push_counted(queue: &mut EventQueue, event: PickEvent) -> (Option<PickEvent>, u64) {
    let evicted = queue.push(event);
    (evicted, queue.dropped())
}

fn log_eviction((evicted, dropped_total): (Option<PickEvent>, u64)) {
    if let Some(old) = evicted {
        debug!(
            event_id = %old.event_id,
            dropped_total,
            "cola llena: se descarta el evento más antiguo"
        );
    }
}

/// Servicio de eventos PICK: un worker en segundo plano que lee frames,
/// marca heartbeats y deja eventos en una cola acotada que vacía la capa HTTP.
///
/// Todos los métodos son seguros desde cualquier hilo. Sólo `stop` bloquea
/// al llamador, y nunca más que el `timeout` indicado.
pub struct PickEventService {
    config: ServiceConfig,
    settings: AcquisitionSettings,
    source: Arc<dyn FrameSourcePort>,
    synthesizers: Arc<dyn SynthesizerFactory>,
    shared: Arc<Shared>,
}

impl PickEventService {
    pub fn new(
        config: ServiceConfig,
        settings: AcquisitionSettings,
        source: Arc<dyn FrameSourcePort>,
    ) -> Self {
        let queue = EventQueue::new(config.max_events);
        Self {
            config,
            settings,
            source,
            synthesizers: Arc::new(DemoSynthesizerFactory),
            shared: Arc::new(Shared {
                state: Mutex::new(ServiceState {
                    running: false,
                    generation: 0,
                    last_error: None,
                    last_heartbeat_ms: None,
                    queue,
                    run: None,
                }),
            }),
        }
    }

    /// Reemplaza la política de eventos sintéticos.
    pub fn with_synthesizers(mut self, factory: Arc<dyn SynthesizerFactory>) -> Self {
        self.synthesizers = factory;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    /// Lanza el worker si no hay uno corriendo. No espera a que arranque.
    pub fn start(&self) {
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
        let stop = StopSignal::new();

        let generation = {
            let mut st = self.shared.lock();
            if st.running {
                return;
            }
            st.generation += 1;
            st.running = true;
            st.last_error = None;
            st.run = Some(RunControl { stop: stop.clone(), done: done_rx });
            st.generation
        };

        let ctx = WorkerContext {
            generation,
            shared: self.shared.clone(),
            stop,
            config: self.config.clone(),
            settings: self.settings.clone(),
            source: self.source.clone(),
            synthesizers: self.synthesizers.clone(),
        };

        let spawned = thread::Builder::new()
            .name("pick-event-worker".into())
            .spawn(move || worker::run(ctx, done_tx));

        match spawned {
            Ok(_) => {
                info!(generation, camera = %self.config.camera_id, "▶️ Servicio PICK iniciado")
            }
            Err(e) => {
                error!("No se pudo lanzar el hilo del worker: {}", e);
                self.shared.finish_run(generation, Some(format!("Spawn: {}", e)));
            }
        }
    }

    /// Pide la parada y espera hasta `timeout` a que el worker termine.
    /// Si no termina a tiempo, retorna igual; el hilo acabará por su cuenta.
    pub fn stop(&self, timeout: Duration) {
        let control = {
            let mut st = self.shared.lock();
            if !st.running {
                return;
            }
            st.running = false;
            st.run.take()
        };

        let Some(control) = control else { return };
        control.stop.raise();

        match control.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                info!(camera = %self.config.camera_id, "⏹️ Servicio PICK detenido")
            }
            Err(RecvTimeoutError::Timeout) => warn!(
                "El worker no terminó en {:?}; se detendrá en segundo plano",
                timeout
            ),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        let st = self.shared.lock();
        ServiceStatus {
            running: st.running,
            phase: ServicePhase::from_flags(st.running, st.last_error.as_deref()),
            camera_id: self.config.camera_id.clone(),
            shelf_id: self.config.shelf_id.clone(),
            roi_id: self.config.roi_id.clone(),
            queued_events: st.queue.len(),
            max_events: st.queue.capacity(),
            dropped_events: st.queue.dropped(),
            last_error: st.last_error.clone(),
            last_heartbeat_ms: st.last_heartbeat_ms,
        }
    }

    /// Saca hasta `limit` eventos, los más antiguos primero.
    /// `limit <= 0` devuelve vacío sin tocar la cola.
    pub fn drain(&self, limit: i64) -> Vec<PickEvent> {
        if limit <= 0 {
            return Vec::new();
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        self.shared.lock().queue.drain_oldest(limit)
    }

    /// Encola un evento directamente (descarta el más antiguo si está llena).
    pub fn emit(&self, event: PickEvent) {
        let pushed = push_counted(&mut self.shared.lock().queue, event);
        log_eviction(pushed);
    }
}
