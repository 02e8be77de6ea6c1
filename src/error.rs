use std::fmt;
use std::path::PathBuf;

/// Every way start-up or resource loading can fail.
///
/// Errors travel up to `main` unchanged; the process exit code is chosen by
/// [`AppError::exit_code`] so each failure site stays distinguishable.
#[derive(Debug)]
pub enum AppError {
    /// The event loop could not be created or run.
    Init(String),
    /// Window, surface, adapter or device creation failed.
    Window(String),
    /// An image file could not be read or decoded.
    ImageLoad { path: PathBuf, source: image::ImageError },
    /// A CPU surface could not be turned into a texture.
    Texture(String),
    /// A font descriptor or its atlas could not be opened or parsed.
    Font { path: PathBuf, reason: String },
    /// A string could not be rasterised.
    TextRender(String),
}

/// Result type used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Init(_) => 1,
            AppError::Window(_) => 2,
            AppError::ImageLoad { .. } => 4,
            AppError::Texture(_) | AppError::Font { .. } | AppError::TextRender(_) => 5,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Init(msg) => write!(f, "Failed to initialize event loop: {msg}"),
            AppError::Window(msg) => write!(f, "Failed to create window or renderer: {msg}"),
            AppError::ImageLoad { path, source } => {
                write!(f, "Failed to load image {}: {source}", path.display())
            }
            AppError::Texture(msg) => write!(f, "Failed to create texture: {msg}"),
            AppError::Font { path, reason } => {
                write!(f, "Failed to open font {}: {reason}", path.display())
            }
            AppError::TextRender(msg) => write!(f, "Failed to render text: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::ImageLoad { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_failure_stage() {
        assert_eq!(AppError::Init("x".into()).exit_code(), 1);
        assert_eq!(AppError::Window("x".into()).exit_code(), 2);
        assert_eq!(AppError::Texture("x".into()).exit_code(), 5);
        assert_eq!(AppError::TextRender("x".into()).exit_code(), 5);
        let font = AppError::Font { path: "a.json".into(), reason: "missing".into() };
        assert_eq!(font.exit_code(), 5);
    }

    #[test]
    fn image_error_keeps_its_source() {
        let err = AppError::ImageLoad {
            path: "cat.png".into(),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "gone",
            )),
        };
        assert_eq!(err.exit_code(), 4);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("cat.png"));
    }
}
