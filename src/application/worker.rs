use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::Sender;
use tracing::{debug, error, info};

use crate::application::pick_service::Shared;
use crate::application::ports::{FrameSourcePort, SynthesizerFactory, Tick};
use crate::domain::{
    acquisition::AcquisitionSettings,
    camera::ServiceConfig,
    errors::DomainResult,
    event::now_ms,
};

/// Señal de parada cooperativa; el worker la consulta una vez por iteración.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Todo lo que una corrida necesita, movido al hilo del worker.
pub(crate) struct WorkerContext {
    pub generation: u64,
    pub shared: Arc<Shared>,
    pub stop: StopSignal,
    pub config: ServiceConfig,
    pub settings: AcquisitionSettings,
    pub source: Arc<dyn FrameSourcePort>,
    pub synthesizers: Arc<dyn SynthesizerFactory>,
}

/// Cuerpo del hilo. Ningún error ni panic sale de aquí: todo termina en
/// `last_error`. `done` se suelta al final para despertar a `stop`.
pub(crate) fn run(ctx: WorkerContext, done: Sender<()>) {
    info!(
        generation = ctx.generation,
        source = %ctx.settings.source,
        "Pick worker: hilo de adquisición iniciado."
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| acquisition_loop(&ctx)));
    let failure = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("{}: {}", e.kind(), e)),
        Err(payload) => Some(format!("Panic: {}", panic_message(payload.as_ref()))),
    };

    match &failure {
        Some(msg) => error!(generation = ctx.generation, "Pick worker terminó con error: {}", msg),
        None => info!(generation = ctx.generation, "Pick worker detenido."),
    }
    ctx.shared.finish_run(ctx.generation, failure);
    drop(done);
}

fn acquisition_loop(ctx: &WorkerContext) -> DomainResult<()> {
    let settings = &ctx.settings;
    if ctx.stop.is_raised() {
        return Ok(());
    }

    // El reader vive en este scope: se libera al salir, incluso por panic.
    let mut reader = ctx.source.open(&settings.source)?;
    let mut synthesizer = ctx.synthesizers.build(&ctx.config, settings);

    let frame_period = settings.frame_period();
    let mut last_heartbeat = Instant::now();
    let mut last_frame = Instant::now();
    let mut fps_est: f32 = 0.0;
    let mut frames: u64 = 0;

    while !ctx.stop.is_raised() {
        let t0 = Instant::now();

        let Some(frame) = reader.read_frame()? else {
            thread::sleep(settings.read_backoff);
            continue;
        };
        if frames == 0 {
            info!(
                width = frame.size.width,
                height = frame.size.height,
                sequence = frame.sequence,
                "Primer frame recibido"
            );
        }
        frames += 1;

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().max(0.001);
        last_frame = now;
        fps_est = 0.9 * fps_est + 0.1 * (1.0 / dt);

        if now.duration_since(last_heartbeat) >= settings.heartbeat_period {
            ctx.shared.record_heartbeat(ctx.generation, now_ms());
            last_heartbeat = now;
        }

        if let Some(synth) = synthesizer.as_mut() {
            if let Some(event) = synth.on_frame(&Tick { now, fps_est }) {
                debug!(event_id = %event.event_id, sku = %event.sku_id, "evento PICK generado");
                ctx.shared.emit_from_run(ctx.generation, event);
            }
        }

        if let Some(rest) = frame_period.checked_sub(t0.elapsed()) {
            if !rest.is_zero() {
                thread::sleep(rest);
            }
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic sin mensaje".to_string()
    }
}
