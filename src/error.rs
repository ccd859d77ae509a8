/// Process-level error carrying a stable exit code for the `eoctab` binary.
///
/// Exit code conventions:
///
/// - `2`: input problems (missing files, malformed CSV blocks, bad arguments)
/// - `3`: table shape problems (duplicate columns, missing variant labels)
/// - `4`: numeric domain violations in the EOC formula
/// - `5`: LaTeX compiler failures
#[derive(Clone)]
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

    /// Input/file/schema problem (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Table shape or label lookup problem (exit code 3).
    pub fn shape(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Numeric domain violation (exit code 4).
    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    /// LaTeX compiler failure (exit code 5).
    pub fn compiler(message: impl Into<String>) -> Self {
        Self::new(5, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
