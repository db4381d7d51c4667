/// Error taxonomy for a tuning run.
///
/// Both variants are fatal: a `Configuration` error is raised before any
/// fitting begins, and a `Fit` error aborts the run rather than emitting
/// malformed rows. There are no transient failures and therefore no retries.
#[derive(Clone, PartialEq, Eq)]
pub enum TuningError {
    /// Invalid run configuration (missing output selector, malformed input
    /// selector, unresolvable signal name or column).
    Configuration(String),
    /// A GLM solve returned an inconsistent or unusable result (wrong
    /// coefficient count, ill-conditioned design, non-finite coefficients).
    Fit(String),
}

impl TuningError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn fit(message: impl Into<String>) -> Self {
        Self::Fit(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_fit(&self) -> bool {
        matches!(self, Self::Fit(_))
    }
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::Fit(msg) => write!(f, "fit error: {msg}"),
        }
    }
}

impl std::fmt::Debug for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => f.debug_tuple("Configuration").field(msg).finish(),
            Self::Fit(msg) => f.debug_tuple("Fit").field(msg).finish(),
        }
    }
}

impl std::error::Error for TuningError {}
