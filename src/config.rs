use std::collections::BTreeMap;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{
    acquisition::AcquisitionSettings,
    camera::{CameraMode, FrameSize, ServiceConfig},
};

/// Claves de texto: su valor de entorno se toma literal (`"01"` sigue siendo
/// `"01"`, no el número 1).
const TEXT_KEYS: [&str; 7] = [
    "http_addr",
    "camera_id",
    "shelf_id",
    "roi_id",
    "cam_source",
    "cam_fourcc",
    "demo_sku",
];

/// Configuración del proceso: valores por defecto, luego un TOML opcional
/// (`PICK_CONFIG`) y por último variables de entorno `PICK_*`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickConfig {
    #[serde(deserialize_with = "lenient_string")]
    pub http_addr: String,

    #[serde(deserialize_with = "lenient_string")]
    pub camera_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub shelf_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub roi_id: String,
    pub max_events: usize,

    /// Índice, ruta o URL de la cámara (`PICK_CAM_SOURCE`).
    #[serde(deserialize_with = "lenient_string")]
    pub cam_source: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cam_fourcc: String,
    pub cam_width: u32,
    pub cam_height: u32,
    pub fps: f64,
    pub heartbeat_s: f64,
    pub backoff_ms: u64,

    /// Acepta `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`.
    #[serde(deserialize_with = "lenient_flag")]
    pub demo: bool,
    pub demo_interval_s: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub demo_sku: String,
    pub demo_track: u64,

    pub stop_timeout_s: f64,
}

impl Default for PickConfig {
    fn default() -> Self {
        let service = ServiceConfig::default();
        let acq = AcquisitionSettings::default();
        Self {
            http_addr: "0.0.0.0:8090".into(),
            camera_id: service.camera_id,
            shelf_id: service.shelf_id,
            roi_id: service.roi_id,
            max_events: service.max_events,
            cam_source: acq.source,
            cam_fourcc: acq.mode.format,
            cam_width: acq.mode.size.width,
            cam_height: acq.mode.size.height,
            fps: acq.mode.fps,
            heartbeat_s: acq.heartbeat_period.as_secs_f64(),
            backoff_ms: acq.read_backoff.as_millis() as u64,
            demo: acq.demo_enabled,
            demo_interval_s: acq.demo_interval.as_secs_f64(),
            demo_sku: acq.demo_sku,
            demo_track: acq.demo_track,
            stop_timeout_s: 2.0,
        }
    }
}

impl PickConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(PickConfig::default()));
        if let Ok(path) = std::env::var("PICK_CONFIG") {
            figment = figment.merge(Toml::file(path));
        }
        let mut ignored = vec!["config"];
        ignored.extend(TEXT_KEYS);
        figment
            .merge(Env::prefixed("PICK_").ignore(&ignored))
            .merge(Serialized::defaults(raw_text_env()))
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            camera_id: self.camera_id.clone(),
            shelf_id: self.shelf_id.clone(),
            roi_id: self.roi_id.clone(),
            max_events: self.max_events.max(1),
        }
    }

    pub fn acquisition_settings(&self) -> AcquisitionSettings {
        let defaults = AcquisitionSettings::default();
        AcquisitionSettings {
            source: self.cam_source.clone(),
            mode: CameraMode {
                format: self.cam_fourcc.clone(),
                size: FrameSize { width: self.cam_width, height: self.cam_height },
                fps: self.fps,
            },
            heartbeat_period: secs_or(self.heartbeat_s, defaults.heartbeat_period),
            read_backoff: Duration::from_millis(self.backoff_ms),
            demo_enabled: self.demo,
            demo_interval: secs_or(self.demo_interval_s, defaults.demo_interval),
            demo_sku: self.demo_sku.clone(),
            demo_track: self.demo_track,
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        secs_or(self.stop_timeout_s, Duration::from_secs(2))
    }
}

fn raw_text_env() -> BTreeMap<&'static str, String> {
    TEXT_KEYS
        .iter()
        .filter_map(|key| {
            let var = format!("PICK_{}", key.to_ascii_uppercase());
            std::env::var(var).ok().map(|value| (*key, value))
        })
        .collect()
}

fn secs_or(secs: f64, fallback: Duration) -> Duration {
    if secs.is_finite() && secs >= 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(fallback)
    } else {
        fallback
    }
}

/// Valor escalar tal como puede llegar desde el entorno o un TOML.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(d)? {
        Scalar::Text(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Bool(b) => Ok(b),
        Scalar::Int(i) => Ok(i != 0),
        Scalar::Float(f) => Ok(f != 0.0),
        Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(de::Error::custom(format!("valor booleano inválido: {other}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_the_demo_setup() {
        let cfg = PickConfig::default();
        let svc = cfg.service_config();
        assert_eq!(svc.camera_id, "cam_01");
        assert_eq!(svc.shelf_id, "est_01");
        assert_eq!(svc.roi_id, "roi_01");
        assert_eq!(svc.max_events, 500);

        let acq = cfg.acquisition_settings();
        assert_eq!(acq, AcquisitionSettings::default());
        assert_eq!(cfg.stop_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn env_variables_override_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("PICK_CAM_SOURCE", "2");
            jail.set_env("PICK_FPS", "15");
            jail.set_env("PICK_HEARTBEAT_S", "0.5");
            jail.set_env("PICK_DEMO", "0");
            jail.set_env("PICK_DEMO_SKU", "7790001");
            jail.set_env("PICK_DEMO_TRACK", "4");
            jail.set_env("PICK_MAX_EVENTS", "10");
            jail.set_env("PICK_SHELF_ID", "est_07");

            let cfg = PickConfig::load()?;
            assert_eq!(cfg.cam_source, "2");
            assert_eq!(cfg.fps, 15.0);
            assert!(!cfg.demo);
            assert_eq!(cfg.demo_sku, "7790001");
            assert_eq!(cfg.demo_track, 4);

            let acq = cfg.acquisition_settings();
            assert_eq!(acq.heartbeat_period, Duration::from_millis(500));
            assert!(!acq.demo_enabled);
            assert_eq!(cfg.service_config().max_events, 10);
            assert_eq!(cfg.service_config().shelf_id, "est_07");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_read_before_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "pick.toml",
                r#"
                camera_id = "cam_09"
                demo = true
                demo_interval_s = 3.0
                "#,
            )?;
            jail.set_env("PICK_CONFIG", "pick.toml");
            jail.set_env("PICK_CAMERA_ID", "cam_10");

            let cfg = PickConfig::load()?;
            assert_eq!(cfg.camera_id, "cam_10");
            assert!(cfg.demo);
            assert_eq!(cfg.acquisition_settings().demo_interval, Duration::from_secs(3));
            Ok(())
        });
    }

    #[test]
    fn env_strings_keep_their_exact_text() {
        Jail::expect_with(|jail| {
            jail.set_env("PICK_DEMO_SKU", "0012345678905");
            jail.set_env("PICK_CAMERA_ID", "01");
            jail.set_env("PICK_ROI_ID", "1.10");
            jail.set_env("PICK_CAM_SOURCE", "0");

            let cfg = PickConfig::load()?;
            assert_eq!(cfg.demo_sku, "0012345678905");
            assert_eq!(cfg.camera_id, "01");
            assert_eq!(cfg.roi_id, "1.10");
            assert_eq!(cfg.cam_source, "0");
            assert_eq!(cfg.acquisition_settings().demo_sku, "0012345678905");
            Ok(())
        });
    }

    #[test]
    fn demo_flag_accepts_words() {
        Jail::expect_with(|jail| {
            jail.set_env("PICK_DEMO", "off");
            assert!(!PickConfig::load()?.demo);
            jail.set_env("PICK_DEMO", "true");
            assert!(PickConfig::load()?.demo);
            jail.set_env("PICK_DEMO", "maybe");
            assert!(PickConfig::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn bad_durations_fall_back() {
        let cfg = PickConfig {
            heartbeat_s: -1.0,
            demo_interval_s: f64::NAN,
            stop_timeout_s: f64::INFINITY,
            max_events: 0,
            ..PickConfig::default()
        };
        let acq = cfg.acquisition_settings();
        assert_eq!(acq.heartbeat_period, Duration::from_secs(2));
        assert_eq!(acq.demo_interval, Duration::from_secs(8));
        assert_eq!(cfg.stop_timeout(), Duration::from_secs(2));
        assert_eq!(cfg.service_config().max_events, 1);
    }
}
