//! DSSAT Translator Library
//!
//! A Rust library for translating between a normalized agronomic
//! experiment/soil/weather data model and the fixed-column-width text files
//! consumed by the DSSAT crop simulation model.
//!
//! This library provides tools for:
//! - Decoding and encoding positional fields against named column layouts
//! - Classifying DSSAT text lines (sections, column headers, comments, data)
//! - Reading weather, soil and observed summary files into domain records
//! - Assigning stable factor-level numbers to repeated experiment sections
//! - Grouping experiments, soils and weather stations into output files
//! - Writing every output file concurrently while tolerating per-file failure

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod fixed_width;
        pub mod grouping;
        pub mod line_classifier;
        pub mod lookup;
        pub mod readers;
        pub mod scheduler;
        pub mod section_index;
        pub mod translation;
        pub mod writers;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::{Dataset, Event, EventKind, Experiment, Fields, Soil, Weather};
pub use config::TranslatorConfig;

/// Result type alias for the DSSAT translator
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for translation operations
///
/// Per-record problems never appear here; they are written as in-band
/// warnings into the affected output file instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Dataset or configuration (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// A scheduled output task could not complete
    #[error("Task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a task failure error
    pub fn task_failed(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskFailed {
            task: task.into(),
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether the error was raised by the file system
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON (de)serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
