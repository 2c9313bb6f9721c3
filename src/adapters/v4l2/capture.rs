use tracing::{info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use crate::application::ports::{FrameReader, FrameSourcePort};
use crate::domain::{
    camera::{source_path, CameraMode, Frame, FrameSize},
    errors::{DomainError, DomainResult},
};

/// Fuente de frames sobre dispositivos V4L2 (`/dev/videoN`).
pub struct V4l2FrameSource {
    mode: CameraMode,
}

impl V4l2FrameSource {
    pub fn new(mode: CameraMode) -> Self {
        Self { mode }
    }
}

impl FrameSourcePort for V4l2FrameSource {
    fn open(&self, source: &str) -> DomainResult<Box<dyn FrameReader>> {
        let path = source_path(source);
        let open_err = |reason: String| DomainError::SourceOpen {
            source_id: path.clone(),
            reason,
        };

        let dev = Device::with_path(&path).map_err(|e| open_err(e.to_string()))?;

        // 1. Formato
        let b = self.mode.format.as_bytes();
        if b.len() != 4 {
            return Err(DomainError::InvalidInput(format!(
                "FourCC debe tener 4 caracteres: {:?}",
                self.mode.format
            )));
        }
        let mut fmt = dev.format().map_err(|e| open_err(e.to_string()))?;
        fmt.fourcc = FourCC::new(&[b[0], b[1], b[2], b[3]]);
        fmt.width = self.mode.size.width;
        fmt.height = self.mode.size.height;
        // El driver puede ajustar a los valores soportados más cercanos.
        let actual = dev.set_format(&fmt).map_err(|e| open_err(e.to_string()))?;

        // 2. FPS (best effort)
        if let Ok(mut params) = dev.params() {
            params.interval.numerator = 1;
            params.interval.denominator = self.mode.fps.max(1.0).round() as u32;
            let _ = dev.set_params(&params);
        }

        // 3. Stream MMAP. El stream guarda su propio handle del dispositivo.
        let stream = Stream::with_buffers(&dev, Type::VideoCapture, 4)
            .map_err(|e| open_err(e.to_string()))?;

        info!(
            "📷 Cámara abierta: {} {}x{} [{}] a {} FPS",
            path, actual.width, actual.height, actual.fourcc, self.mode.fps
        );

        Ok(Box::new(V4l2Reader {
            stream,
            _device: dev,
            size: FrameSize { width: actual.width, height: actual.height },
        }))
    }
}

// El stream se suelta antes que el dispositivo.
struct V4l2Reader {
    stream: Stream<'static>,
    _device: Device,
    size: FrameSize,
}

impl FrameReader for V4l2Reader {
    fn read_frame(&mut self) -> DomainResult<Option<Frame>> {
        match self.stream.next() {
            Ok((data, meta)) => Ok(Some(Frame {
                size: self.size,
                sequence: u64::from(meta.sequence),
                data: data.to_vec(),
            })),
            Err(e) => {
                warn!("Error capturando frame: {}", e);
                Ok(None)
            }
        }
    }
}
