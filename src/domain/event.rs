use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::camera::ServiceConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Pick,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationMethod {
    Demo,
}

/// Evento de retiro de producto detectado frente a un estante.
/// Inmutable una vez creado; la cola sólo lo mueve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickEvent {
    pub event_type: EventType,
    pub event_id: Uuid,
    pub timestamp_ms: i64,
    pub camera_id: String,
    #[serde(rename = "estante_id")]
    pub shelf_id: String,
    pub roi_id: String,
    pub sku_id: String,
    pub track_id: u64,
    pub confidence: f32,
    pub confirmation_method: ConfirmationMethod,
    pub evidence: Map<String, Value>,
}

impl PickEvent {
    /// Crea un evento PICK con id nuevo y la hora actual.
    /// La confianza se recorta a [0, 1].
    pub fn pick(
        config: &ServiceConfig,
        sku_id: impl Into<String>,
        track_id: u64,
        confidence: f32,
        confirmation_method: ConfirmationMethod,
        evidence: Map<String, Value>,
    ) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self {
            event_type: EventType::Pick,
            event_id: Uuid::new_v4(),
            timestamp_ms: now_ms(),
            camera_id: config.camera_id.clone(),
            shelf_id: config.shelf_id.clone(),
            roi_id: config.roi_id.clone(),
            sku_id: sku_id.into(),
            track_id,
            confidence,
            confirmation_method,
            evidence,
        }
    }
}

/// Milisegundos desde epoch (reloj de pared).
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pick_copies_identifiers_and_clamps_confidence() {
        let cfg = ServiceConfig::default();
        let ev = PickEvent::pick(&cfg, "SKU_1", 7, 1.7, ConfirmationMethod::Demo, Map::new());
        assert_eq!(ev.camera_id, "cam_01");
        assert_eq!(ev.shelf_id, "est_01");
        assert_eq!(ev.roi_id, "roi_01");
        assert_eq!(ev.confidence, 1.0);

        let ev = PickEvent::pick(&cfg, "SKU_1", 7, f32::NAN, ConfirmationMethod::Demo, Map::new());
        assert_eq!(ev.confidence, 0.0);
    }

    #[test]
    fn events_get_distinct_ids() {
        let cfg = ServiceConfig::default();
        let a = PickEvent::pick(&cfg, "A", 1, 0.5, ConfirmationMethod::Demo, Map::new());
        let b = PickEvent::pick(&cfg, "A", 1, 0.5, ConfirmationMethod::Demo, Map::new());
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn serializes_with_wire_tags() {
        let cfg = ServiceConfig::default();
        let mut evidence = Map::new();
        evidence.insert("fps".into(), json!(30.0));
        let ev = PickEvent::pick(&cfg, "SKU_DEMO", 1, 0.5, ConfirmationMethod::Demo, evidence);
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["event_type"], "PICK");
        assert_eq!(v["confirmation_method"], "demo");
        assert_eq!(v["estante_id"], "est_01");
        assert!(v.get("shelf_id").is_none());
        assert_eq!(v["evidence"]["fps"], 30.0);
        assert!(v["event_id"].is_string());
    }
}
