use std::fmt::{Display, Formatter, Result as FmtResult};

/// Runtime failures of a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchError {
    /// A measurement exceeded its timeout budget before finishing all frames.
    /// Recovered locally by skipping the remaining counts of that workload.
    Timeout { elapsed_ms: f64, limit_ms: f64 },
    /// No 2D context could be obtained for an offscreen canvas.
    SurfaceUnavailable(String),
    /// The source image could not be fetched or decoded.
    ImageLoadFailed(String),
    /// window / document / element lookups failed.
    BrowserApi(String),
    /// A suite declaration was rejected while binding it.
    InvalidSuite(ValidationError),
    /// Another run already owns the surface.
    RunInProgress,
}

impl BenchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BenchError::Timeout { .. })
    }
}

impl Display for BenchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BenchError::Timeout { elapsed_ms, limit_ms } => {
                write!(f, "Timeout: {:.2}ms exceeds limit {:.2}ms", elapsed_ms, limit_ms)
            }
            BenchError::SurfaceUnavailable(msg) => write!(f, "Surface unavailable: {}", msg),
            BenchError::ImageLoadFailed(msg) => write!(f, "Image load failed: {}", msg),
            BenchError::BrowserApi(msg) => write!(f, "Browser API error: {}", msg),
            BenchError::InvalidSuite(e) => write!(f, "Invalid suite: {}", e),
            BenchError::RunInProgress => write!(f, "A benchmark run is already in progress"),
        }
    }
}

impl std::error::Error for BenchError {}

impl From<ValidationError> for BenchError {
    fn from(error: ValidationError) -> Self {
        BenchError::InvalidSuite(error)
    }
}

/// Rejected input: workload set declarations and configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyRepetitionCounts { set: String },
    NonIncreasingRepetitionCounts { set: String, previous: u32, next: u32 },
    DuplicateWorkloadName { set: String, name: String },
    InvalidConfig(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValidationError::EmptyRepetitionCounts { set } => {
                write!(f, "Workload set '{}' declares no repetition counts", set)
            }
            ValidationError::NonIncreasingRepetitionCounts { set, previous, next } => write!(
                f,
                "Workload set '{}' repetition counts must increase: {} is followed by {}",
                set, previous, next
            ),
            ValidationError::DuplicateWorkloadName { set, name } => {
                write!(f, "Workload set '{}' declares '{}' twice", set, name)
            }
            ValidationError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type BenchResult<T> = Result<T, BenchError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
