use std::borrow::Cow;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    TerminalUi { source: crate::ui::terminal::Error },

    #[snafu(display(
        "Failed to execute command in pod {pod_name} in namespace {namespace}, error: {source}"
    ))]
    ExecPod {
        namespace: String,
        pod_name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Error occurs while copying I/O, error: {source}"))]
    CopyIo { source: std::io::Error },

    #[snafu(display("Error occurs while copying I/O bidirectionally, error: {source}"))]
    CopyBidirectionalIo { source: std::io::Error },

    #[snafu(display("Failed to read remote command output, error: {source}"))]
    ReadRemoteOutput { source: std::io::Error },

    #[snafu(display("{message}"))]
    RemoteCommand { message: String },

    #[snafu(display("{stream} requested but missing"))]
    GetPodStream { stream: Cow<'static, str> },

    #[snafu(display("Failed to get terminal size, error: {source}"))]
    GetTerminalSize { source: std::io::Error },

    #[snafu(display("Failed to change terminal size"))]
    ChangeTerminalSize,

    #[snafu(display("Failed to create signal stream, error: {source}"))]
    CreateSignalStream { source: std::io::Error },

    #[snafu(display("Failed to get terminal size writer"))]
    GetTerminalSizeWriter,
}

impl From<crate::ui::terminal::Error> for Error {
    fn from(source: crate::ui::terminal::Error) -> Self { Self::TerminalUi { source } }
}
