use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to determine the user home directory"))]
    HomeDirectory,

    #[snafu(display("Failed to read environments directory {}, error: {source}", path.display()))]
    ReadEnvironmentsDir { path: PathBuf, source: std::io::Error },

    #[snafu(display("No environments found in {}", path.display()))]
    NoEnvironments { path: PathBuf },

    #[snafu(display("Failed to write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Failed to read selection from stdin, error: {source}"))]
    ReadSelection { source: std::io::Error },

    #[snafu(display("Invalid selection '{input}', expected a number between 1 and {count}"))]
    InvalidSelection { input: String, count: usize },

    #[snafu(display(
        "Failed to copy kubeconfig from {} to {}, error: {source}",
        from.display(),
        to.display()
    ))]
    CopyKubeconfig { from: PathBuf, to: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to read kubeconfig from {}, error: {source}", path.display()))]
    ReadKubeconfig { path: PathBuf, source: kube::config::KubeconfigError },

    #[snafu(display("No current context is set in {}", path.display()))]
    CurrentContextNotSet { path: PathBuf },
}
