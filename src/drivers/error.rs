use thiserror::Error;
/// Failures at the transport boundary. Anything reported here ends the acquisition thread.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to open serial port {port}: {source}")]
    OpenPort {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to open replay file {path}: {source}")]
    OpenReplay {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line source read failed: {0}")]
    Io(#[from] std::io::Error),
}
