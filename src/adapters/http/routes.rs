use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::adapters::http::state::HttpState;
use crate::application::dto::{ErrorResponse, EventsQuery, EventsResponse, StatusResponse};

const UNAVAILABLE: &str =
    "Servicio PICK no disponible (sin backend de captura compilado o falló su inicialización)";

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorResponse::new(UNAVAILABLE))).into_response()
}

pub async fn pick_status(State(st): State<HttpState>) -> Response {
    let Some(svc) = st.pick.as_ref() else { return unavailable() };
    Json(StatusResponse::from(svc.status())).into_response()
}

pub async fn pick_start(State(st): State<HttpState>) -> Response {
    let Some(svc) = st.pick.as_ref() else { return unavailable() };
    svc.start();
    Json(StatusResponse::from(svc.status())).into_response()
}

/// `stop` bloquea hasta `stop_timeout`, así que corre en el pool bloqueante.
pub async fn pick_stop(State(st): State<HttpState>) -> Response {
    let Some(svc) = st.pick.clone() else { return unavailable() };
    let timeout = st.stop_timeout;

    match tokio::task::spawn_blocking(move || {
        svc.stop(timeout);
        svc.status()
    })
    .await
    {
        Ok(status) => Json(StatusResponse::from(status)).into_response(),
        Err(e) => {
            error!("❌ Fallo deteniendo el servicio PICK: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e.to_string())))
                .into_response()
        }
    }
}

pub async fn pick_events(
    State(st): State<HttpState>,
    Query(query): Query<EventsQuery>,
) -> Response {
    let Some(svc) = st.pick.as_ref() else { return unavailable() };
    Json(EventsResponse::from(svc.drain(query.limit()))).into_response()
}
