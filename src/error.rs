//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with package.json reading and parsing (fatal)
//! - SuggestionError: Issues with the upgrade suggestion engine output (fatal)
//! - LockfileError: Issues with lockfile parsing (recovered to an empty lookup)
//! - RegistryError: Issues with registry/probe communication (recovered to omission)
//! - OutputError: Report and debug dump write failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Suggestion engine related errors
    #[error(transparent)]
    Suggestion(#[from] SuggestionError),

    /// Evidence transport construction errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Output related errors
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors related to package.json operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// The manifest parsed but its root is not an object
    #[error("manifest {path} is not a JSON object")]
    NotAnObject { path: PathBuf },
}

/// Errors related to the upgrade suggestion engine
#[derive(Error, Debug)]
pub enum SuggestionError {
    /// The mapping is neither flat nor workspace-nested
    #[error("invalid suggestion output: {message}")]
    InvalidShape { message: String },

    /// A suggested range is not a string
    #[error("suggested range for '{package}' in {package_file} is not a string")]
    NonStringRange {
        package_file: String,
        package: String,
    },

    /// The engine command could not be run or exited unsuccessfully
    #[error("suggestion command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Failed to read a suggestion file
    #[error("failed to read suggestion file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Suggestion output is not valid JSON
    #[error("failed to parse suggestion output from {origin}: {message}")]
    JsonParseError { origin: String, message: String },
}

/// Errors related to lockfile parsing
#[derive(Error, Debug)]
pub enum LockfileError {
    /// Failed to read the lockfile
    #[error("failed to read lockfile {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lockfile content could not be parsed
    #[error("failed to parse lockfile {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Lockfile parsed but its structure is not what the format expects
    #[error("unexpected lockfile structure in {path}: {message}")]
    UnexpectedShape { path: PathBuf, message: String },
}

/// Errors related to package registry and URL probing
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to writing output files
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a value
    #[error("failed to serialize {what}: {message}")]
    SerializeError { what: String, message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SuggestionError {
    /// Creates a new InvalidShape error
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        SuggestionError::InvalidShape {
            message: message.into(),
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        SuggestionError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl LockfileError {
    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LockfileError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new UnexpectedShape error
    pub fn unexpected_shape(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LockfileError::UnexpectedShape {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl OutputError {
    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutputError::WriteError {
            path: path.into(),
            source,
        }
    }
}
