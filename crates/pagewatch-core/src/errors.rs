use crate::core_types::schema::{
    OP_FETCH, OP_LOAD_SETTINGS, OP_NOTIFY, OP_VALIDATE_SCHEDULE,
};
use thiserror::Error;

/// Result type alias using WatchError
pub type Result<T> = std::result::Result<T, WatchError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Stable classification of every failure the watcher can report. Each kind
/// maps to a stable error code used in `end_error` log events and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidSchedule,
    MissingConfig,
    InvalidConfig,

    // Fetch
    /// Connection-reset class failure, eligible for one retry
    TransientNetwork,
    Network,
    HttpStatus,

    // Delivery
    Delivery,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSchedule => "ERR_INVALID_SCHEDULE",
            ExErrorKind::MissingConfig => "ERR_MISSING_CONFIG",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::TransientNetwork => "ERR_TRANSIENT_NETWORK",
            ExErrorKind::Network => "ERR_NETWORK",
            ExErrorKind::HttpStatus => "ERR_HTTP_STATUS",
            ExErrorKind::Delivery => "ERR_DELIVERY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context needed to read a failed
/// cycle out of the logs: which operation, which watch target, which URL,
/// which attempt and which HTTP status.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    watch_name: Option<String>,
    url: Option<String>,
    attempt: Option<u32>,
    status: Option<u16>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            watch_name: None,
            url: None,
            attempt: None,
            status: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add watch target name context
    pub fn with_watch_name(mut self, name: impl Into<String>) -> Self {
        self.watch_name = Some(name.into());
        self
    }

    /// Add URL context
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add attempt number context (1-based)
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Add HTTP status context
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the watch target name, if any
    pub fn watch_name(&self) -> Option<&str> {
        self.watch_name.as_deref()
    }

    /// Get the URL context, if any
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Get the attempt number, if any
    pub fn attempt(&self) -> Option<u32> {
        self.attempt
    }

    /// Get the HTTP status, if any
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(name) = &self.watch_name {
            write!(f, " (watch: {})", name)?;
        }
        if let Some(url) = &self.url {
            write!(f, " (url: {})", url)?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {})", status)?;
        }
        if let Some(attempt) = self.attempt {
            write!(f, " (attempt: {})", attempt)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for watcher operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    // ===== Configuration Errors =====
    /// Recurrence expression did not parse
    #[error("The cron expression '{expression}' is invalid: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    /// Required configuration key absent or empty
    #[error("Missing configuration value: {key}")]
    MissingConfig { key: String },

    /// Configuration key present but unusable
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    // ===== Fetch Errors =====
    /// Connection reset by the peer (retryable once)
    #[error("Connection reset while fetching {url}: {message}")]
    ConnectionReset { url: String, message: String },

    /// Any other transport failure (DNS, refused, timeout, body decode)
    #[error("Fetch failed for {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// Server answered with a non-success status
    #[error("Fetch of {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // ===== Delivery Errors =====
    /// Notification sink rejected or never received the message
    #[error("Notification delivery failed: {message}")]
    DeliveryFailed {
        message: String,
        status: Option<u16>,
    },

    // ===== Generic Errors =====
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WatchError {
    /// Whether the fetch that produced this error may be retried
    pub fn is_transient(&self) -> bool {
        matches!(self, WatchError::ConnectionReset { .. })
    }

    /// Shorthand for the canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }
}

/// Conversion from WatchError to the canonical ExError
impl From<WatchError> for ExError {
    fn from(err: WatchError) -> Self {
        let message = err.to_string();
        match err {
            WatchError::InvalidSchedule { .. } => ExError::new(ExErrorKind::InvalidSchedule)
                .with_op(OP_VALIDATE_SCHEDULE)
                .with_message(message),

            WatchError::MissingConfig { .. } => ExError::new(ExErrorKind::MissingConfig)
                .with_op(OP_LOAD_SETTINGS)
                .with_message(message),

            WatchError::InvalidConfig { .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op(OP_LOAD_SETTINGS)
                .with_message(message),

            WatchError::ConnectionReset { url, .. } => {
                ExError::new(ExErrorKind::TransientNetwork)
                    .with_op(OP_FETCH)
                    .with_url(url)
                    .with_message(message)
            }

            WatchError::FetchFailed { url, .. } => ExError::new(ExErrorKind::Network)
                .with_op(OP_FETCH)
                .with_url(url)
                .with_message(message),

            WatchError::HttpStatus { url, status } => ExError::new(ExErrorKind::HttpStatus)
                .with_op(OP_FETCH)
                .with_url(url)
                .with_status(status)
                .with_message(message),

            WatchError::DeliveryFailed { status, .. } => {
                let ex = ExError::new(ExErrorKind::Delivery)
                    .with_op(OP_NOTIFY)
                    .with_message(message);
                match status {
                    Some(status) => ex.with_status(status),
                    None => ex,
                }
            }

            WatchError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}
