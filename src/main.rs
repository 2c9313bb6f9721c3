mod adapters;
mod application;
mod config;
mod domain;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::adapters::http::{router, state::HttpState};
use crate::application::pick_service::PickEventService;
use crate::config::PickConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logs (RUST_LOG=info por defecto)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 2. Configuración: defaults + PICK_CONFIG (TOML) + variables PICK_*
    let cfg = PickConfig::load()?;
    let settings = cfg.acquisition_settings();

    // 3. Servicio PICK, sólo si hay un backend de captura compilado.
    let pick = match adapters::frame_source(&settings) {
        Some(source) => {
            tracing::info!(source = %settings.source, "🔧 Servicio PICK listo (detenido)");
            Some(Arc::new(PickEventService::new(cfg.service_config(), settings, source)))
        }
        None => {
            tracing::warn!(
                "⚠️ Sin backend de captura (compilado sin v4l2); /api/pick responderá 503"
            );
            None
        }
    };

    let state = HttpState { pick: pick.clone(), stop_timeout: cfg.stop_timeout() };
    let app = router(state);

    // 4. Servidor
    let listener = tokio::net::TcpListener::bind(&cfg.http_addr).await?;
    tracing::info!("🚀 Servidor PICK iniciado en http://{}", cfg.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Señal de apagado recibida");
        })
        .await?;

    if let Some(svc) = pick.filter(|svc| svc.is_running()) {
        tracing::info!("Deteniendo el servicio PICK antes de salir");
        let timeout = cfg.stop_timeout();
        tokio::task::spawn_blocking(move || svc.stop(timeout)).await?;
    }

    Ok(())
}
