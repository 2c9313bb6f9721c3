use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("no se pudo abrir la cámara/source {source_id}: {reason}")]
    SourceOpen { source_id: String, reason: String },
    #[error("fallo de captura: {0}")]
    Capture(String),
    #[error("entrada inválida: {0}")]
    InvalidInput(String),
}

impl DomainError {
    /// Nombre corto de la variante, usado como prefijo de `last_error`.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::SourceOpen { .. } => "SourceOpen",
            DomainError::Capture(_) => "Capture",
            DomainError::InvalidInput(_) => "InvalidInput",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_open_message_names_the_source() {
        let err = DomainError::SourceOpen {
            source_id: "/dev/video9".into(),
            reason: "No such file or directory".into(),
        };
        assert_eq!(err.kind(), "SourceOpen");
        assert!(err.to_string().contains("/dev/video9"));
    }
}
