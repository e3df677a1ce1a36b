use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutoMlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Dataset download from {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field '{field}'")]
    MissingConfigError { field: String },

    #[error("{columns:?} column(s) not in DataFrame")]
    ColumnNotFound { columns: Vec<String> },

    #[error("Provided DataFrame is empty")]
    EmptyFrame,

    #[error("{message}")]
    EmptySelection { message: String },

    #[error("{transformer} is not fitted yet, call fit before transform")]
    NotFitted { transformer: String },

    #[error("Wrong shape is passed to transform. Trained on {expected} cols got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Column dtypes were not equal during fit and transform. Fit types: {fit:?}, transform: {transform:?}")]
    DtypeMismatch {
        fit: Vec<String>,
        transform: Vec<String>,
    },

    #[error("Column '{column}' has unsupported content: {reason}")]
    UnsupportedDtype { column: String, reason: String },

    #[error("imputation {what} is not valid for dtype {dtype} (column '{column}')")]
    InvalidImputation {
        column: String,
        dtype: String,
        what: String,
    },

    #[error("Target column {column} has only one unique value")]
    ConstantTarget { column: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Configuration,
    Data,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AutoMlError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn column_not_found<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ColumnNotFound {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_)
            | Self::ColumnNotFound { .. }
            | Self::EmptyFrame
            | Self::EmptySelection { .. }
            | Self::ShapeMismatch { .. }
            | Self::DtypeMismatch { .. }
            | Self::UnsupportedDtype { .. }
            | Self::InvalidImputation { .. }
            | Self::ConstantTarget { .. } => ErrorCategory::Data,
            Self::SerializationError(_) | Self::NotFitted { .. } | Self::ProcessingError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => {
                "Check the dataset URL and network connectivity, then retry"
            }
            Self::IoError(_) => "Check that the dataset path exists and the output path is writable",
            Self::ZipError(_) => "Check free disk space in the output directory",
            Self::CsvError(_) => "Make sure the dataset is a well-formed CSV with a consistent column count",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration value and run again",
            Self::ColumnNotFound { .. } => "Check the column names against the dataset header",
            Self::EmptyFrame => "Provide a dataset with at least one row and one column",
            Self::EmptySelection { .. } => "Select at least one column that is present in the dataset",
            Self::ConstantTarget { .. } => "Choose a target column with more than one distinct value",
            Self::InvalidImputation { .. } => "Pick an imputation scheme compatible with the column dtype",
            Self::UnsupportedDtype { .. } | Self::DtypeMismatch { .. } | Self::ShapeMismatch { .. } => {
                "Transform data with the same layout the transformer was fitted on"
            }
            Self::NotFitted { .. } | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Run with --verbose and report the log if the problem persists"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the dataset: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Dataset problem: {}", self),
            ErrorCategory::Internal => format!("Unexpected failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutoMlError>;
