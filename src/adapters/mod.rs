pub mod http;
#[cfg(feature = "v4l2")]
pub mod v4l2;

use std::sync::Arc;

use crate::application::ports::FrameSourcePort;
use crate::domain::acquisition::AcquisitionSettings;

/// Backend de captura compilado en este binario, si hay alguno.
#[cfg(feature = "v4l2")]
pub fn frame_source(settings: &AcquisitionSettings) -> Option<Arc<dyn FrameSourcePort>> {
    Some(Arc::new(v4l2::capture::V4l2FrameSource::new(settings.mode.clone())))
}

#[cfg(not(feature = "v4l2"))]
pub fn frame_source(_settings: &AcquisitionSettings) -> Option<Arc<dyn FrameSourcePort>> {
    None
}
