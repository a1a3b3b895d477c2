mod error;

use futures::{SinkExt, channel::mpsc::Sender};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api,
    api::{AttachParams, TerminalSize},
};
use snafu::{OptionExt, ResultExt};
use tokio::{io::AsyncReadExt, signal};

pub use self::error::Error;
use crate::ui::terminal::TerminalRawModeGuard;

/// A single exec session against a running pod.
///
/// The session is either fully interactive (a TTY attached to the local
/// terminal) or non-interactive (remote output copied or captured locally).
#[derive(Clone, Debug)]
pub struct PodConsole {
    api: Api<Pod>,
    pod_name: String,
    namespace: String,
    command: Vec<String>,
}

impl PodConsole {
    pub fn new<I, S>(
        api: Api<Pod>,
        pod_name: impl Into<String>,
        namespace: impl Into<String>,
        command: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api,
            pod_name: pod_name.into(),
            namespace: namespace.into(),
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// Attaches an interactive TTY session, blocking until the user exits.
    pub async fn attach(self) -> Result<(), Error> {
        let Self { api, pod_name, namespace, command } = self;

        // The guard restores the local terminal even on early return.
        let _raw_mode_guard = TerminalRawModeGuard::setup()?;

        let mut attached = api
            .exec(
                &pod_name,
                command,
                &AttachParams {
                    stdin: true,
                    stdout: true,
                    stderr: false,
                    tty: true,
                    ..AttachParams::default()
                },
            )
            .await
            .with_context(|_| error::ExecPodSnafu {
                namespace: namespace.clone(),
                pod_name: pod_name.clone(),
            })?;

        let pod_stdout =
            attached.stdout().context(error::GetPodStreamSnafu { stream: "stdout" })?;
        let pod_stdin = attached.stdin().context(error::GetPodStreamSnafu { stream: "stdin" })?;
        let term_tx = attached.terminal_size().context(error::GetTerminalSizeWriterSnafu)?;

        // Keep the remote TTY sized like the local terminal.
        let cancel_token = tokio_util::sync::CancellationToken::new();
        let mut terminal_size_handle =
            tokio::spawn(forward_terminal_size(term_tx, cancel_token.clone()));

        let mut pod_combined = tokio::io::join(pod_stdout, pod_stdin);
        let mut local_combined = tokio::io::join(tokio::io::stdin(), tokio::io::stdout());

        tokio::select! {
            result = tokio::io::copy_bidirectional(&mut local_combined, &mut pod_combined) => {
                if let Err(err) = result && err.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(err).context(error::CopyBidirectionalIoSnafu);
                }
            },
            result = &mut terminal_size_handle => {
                match result {
                    Ok(_) => tracing::info!("End of terminal size stream"),
                    Err(err) => tracing::warn!("Error getting terminal size: {err}")
                }
            },
        }

        cancel_token.cancel();
        let _unused = terminal_size_handle.await;
        let _unused = attached.join().await;

        Ok(())
    }

    /// Runs the command without a TTY, copying remote stdout and stderr to
    /// the local process. A remote failure status becomes an error.
    pub async fn execute(self) -> Result<(), Error> {
        let Self { api, pod_name, namespace, command } = self;

        let mut attached = api
            .exec(
                &pod_name,
                command,
                &AttachParams {
                    stdin: false,
                    stdout: true,
                    stderr: true,
                    tty: false,
                    ..AttachParams::default()
                },
            )
            .await
            .with_context(|_| error::ExecPodSnafu {
                namespace: namespace.clone(),
                pod_name: pod_name.clone(),
            })?;

        let mut pod_stdout =
            attached.stdout().context(error::GetPodStreamSnafu { stream: "stdout" })?;
        let mut pod_stderr =
            attached.stderr().context(error::GetPodStreamSnafu { stream: "stderr" })?;
        let status = attached.take_status();

        let mut stdout = tokio::io::stdout();
        let mut stderr = tokio::io::stderr();
        let _bytes = tokio::try_join!(
            tokio::io::copy(&mut pod_stdout, &mut stdout),
            tokio::io::copy(&mut pod_stderr, &mut stderr),
        )
        .context(error::CopyIoSnafu)?;

        if let Some(status) = status
            && let Some(status) = status.await
            && status.status.as_deref() == Some("Failure")
        {
            let message = status
                .message
                .unwrap_or_else(|| format!("command failed in pod {pod_name}"));
            return error::RemoteCommandSnafu { message }.fail();
        }

        let _unused = attached.join().await;
        Ok(())
    }

    /// Runs the command without a TTY and returns its captured stdout.
    pub async fn execute_captured(self) -> Result<String, Error> {
        let Self { api, pod_name, namespace, command } = self;

        let mut attached = api
            .exec(
                &pod_name,
                command,
                &AttachParams {
                    stdin: false,
                    stdout: true,
                    stderr: false,
                    tty: false,
                    ..AttachParams::default()
                },
            )
            .await
            .with_context(|_| error::ExecPodSnafu {
                namespace: namespace.clone(),
                pod_name: pod_name.clone(),
            })?;

        let mut pod_stdout =
            attached.stdout().context(error::GetPodStreamSnafu { stream: "stdout" })?;

        let mut output = String::new();
        let _bytes = pod_stdout
            .read_to_string(&mut output)
            .await
            .context(error::ReadRemoteOutputSnafu)?;

        let _unused = attached.join().await;
        Ok(output)
    }
}

/// Mirrors the local terminal size to the remote TTY until cancelled.
async fn forward_terminal_size(
    mut channel: Sender<TerminalSize>,
    cancel_token: tokio_util::sync::CancellationToken,
) -> Result<(), Error> {
    send_current_size(&mut channel).await?;

    // Resize notifications arrive as SIGWINCH.
    let mut signal = signal::unix::signal(signal::unix::SignalKind::window_change())
        .context(error::CreateSignalStreamSnafu)?;

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            maybe_signal = signal.recv() => {
                if maybe_signal.is_none() {
                    break;
                }
                send_current_size(&mut channel).await?;
            }
        }
    }

    Ok(())
}

async fn send_current_size(channel: &mut Sender<TerminalSize>) -> Result<(), Error> {
    let (width, height) = crossterm::terminal::size().context(error::GetTerminalSizeSnafu)?;
    channel.send(TerminalSize { height, width }).await.map_err(|_| Error::ChangeTerminalSize)
}
