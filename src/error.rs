use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Failures that stop the demo before the first frame.
///
/// `main` maps these to exit code -1; every other error exits with 1.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize {stage}: {message}")]
    Window { stage: &'static str, message: String },
    #[error("failed to initialize GPU {stage}: {message}")]
    Gpu { stage: &'static str, message: String },
}

impl StartupError {
    pub fn window(stage: &'static str, err: impl fmt::Display) -> Self {
        Self::Window {
            stage,
            message: err.to_string(),
        }
    }

    /// The platform layer may panic instead of returning an error when no
    /// display is available.
    pub fn window_panic(stage: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self::Window {
            stage,
            message: panic_message(panic),
        }
    }

    pub fn gpu(stage: &'static str, err: impl fmt::Display) -> Self {
        Self::Gpu {
            stage,
            message: err.to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}
