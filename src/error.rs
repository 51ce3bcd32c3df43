//! Error type shared by synthesis, graph assembly and device control.

/// Errors surfaced by the drone engine.
///
/// Every failure is reported synchronously to the caller of the operation
/// that triggered it; nothing is retried on the caller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum DroneError {
    /// A value was outside the range an operation accepts
    InvalidArgument { name: &'static str, reason: String },
    /// A control name that does not match any parameter
    UnknownParameter(String),
    /// The output device could not be opened, resumed or fed
    DeviceUnavailable(String),
}

impl DroneError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DroneError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn device(reason: impl Into<String>) -> Self {
        DroneError::DeviceUnavailable(reason.into())
    }
}

impl std::fmt::Display for DroneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DroneError::InvalidArgument { name, reason } => {
                write!(f, "invalid argument `{}`: {}", name, reason)
            }
            DroneError::UnknownParameter(name) => {
                write!(f, "unknown parameter `{}`", name)
            }
            DroneError::DeviceUnavailable(reason) => {
                write!(f, "audio device unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for DroneError {}
