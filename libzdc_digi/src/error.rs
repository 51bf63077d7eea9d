use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("Invalid ZDC side {0}; expected -1 or +1")]
    BadSide(i32),
    #[error("Invalid ZDC section {0}; expected 1 (EM) or 2 (HAD)")]
    BadSection(i32),
    #[error("Invalid channel {channel} for ZDC section {section}; expected 1..={max}")]
    BadChannel { section: i32, channel: i32, max: u8 },
}

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Event {0} has no digi collection with tag {1:?}")]
    MissingCollection(u64, String),
}

#[derive(Debug, Error)]
pub enum HDF5WriterError {
    #[error("HDF5Writer failed due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("HDF5Writer failed to convert a string attribute: {0}")]
    StringError(#[from] hdf5::types::StringError),
    #[error("HDF5Writer could not create file {0:?} because its directory does not exist")]
    BadFilePath(PathBuf),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink failed due to HDF5Writer error: {0}")]
    HDFError(#[from] HDF5WriterError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Could not open input file {0:?} because it does not exist")]
    BadFilePath(PathBuf),
    #[error("Input failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Input failed to parse an event from YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config has an empty digi_tag")]
    EmptyTag,
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Input error: {0}")]
    InputError(#[from] InputError),
    #[error("Processor failed due to Sink error: {0}")]
    SinkError(#[from] SinkError),
    #[error("Processor failed due to HDF5Writer error: {0}")]
    HDFError(#[from] HDF5WriterError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
}
