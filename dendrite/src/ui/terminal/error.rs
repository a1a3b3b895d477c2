use snafu::Snafu;

/// Represents errors that can occur during terminal operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Error returned when failing to enable terminal raw mode.
    #[snafu(display("Failed to enable terminal raw mode, error: {source}"))]
    EnableTerminalRawMode { source: std::io::Error },
}
