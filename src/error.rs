//! Application-level error carrying a process exit code.
//!
//! Exit codes:
//! - `2`: the capture file could not be opened/read, a field failed to parse,
//!   or a command-line value is malformed
//! - `3`: the loaded data cannot support the requested analysis (empty capture,
//!   window outside the series, zero stride)
//! - `4`: a fit failed, or a figure could not be rendered/displayed

pub const EXIT_INPUT: u8 = 2;
pub const EXIT_DATA: u8 = 3;
pub const EXIT_FIT: u8 = 4;
/// Rendering failures share the fit exit code.
pub const EXIT_RENDER: u8 = EXIT_FIT;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(EXIT_DATA, message)
    }

    pub fn fit(message: impl Into<String>) -> Self {
        Self::new(EXIT_FIT, message)
    }

    /// A figure or report could not be written or shown.
    pub fn render(message: impl Into<String>) -> Self {
        Self::new(EXIT_RENDER, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<crate::fit::FitError> for AppError {
    fn from(err: crate::fit::FitError) -> Self {
        AppError::fit(err.to_string())
    }
}
