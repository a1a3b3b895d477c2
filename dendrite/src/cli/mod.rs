//! The `dendrite` command line interface.
//!
//! The CLI is a single flag surface with a closed set of modes: every
//! invocation names an operation with `--mode` and the remaining flags are
//! validated per mode before anything talks to the cluster.
//!
//! # Examples
//!
//! ```bash
//! # Open an interactive shell in the billing app's pod
//! dendrite -a billing -m bash
//!
//! # Run a one-off command in the pod instead
//! dendrite -a billing -m bash -- ls -la /app
//!
//! # Read one entry of the app's Secret
//! dendrite -a billing -m get-secret -e API_KEY
//!
//! # Switch the active kubeconfig to a stored environment
//! dendrite -m switch-env
//! ```

mod branch;
pub mod error;
mod internal;
mod postgres;
mod rails;
mod secret;
mod shell;

use std::{fmt, io::Write, path::PathBuf};

use clap::{CommandFactory, Parser, ValueEnum};
use snafu::{OptionExt, ResultExt};
use tokio::runtime::Runtime;

pub use self::error::Error;
use self::{
    branch::GetBranchCommand,
    postgres::PostgresLoginCommand,
    rails::RailsCommand,
    secret::{GetSecretCommand, SetSecretCommand},
    shell::ShellCommand,
};
use crate::{CLI_PROGRAM_NAME, config::Config, kube_env::KubeEnv};

#[derive(Parser)]
#[command(
    name = CLI_PROGRAM_NAME,
    author,
    version,
    about = "Dendrite CLI: interact with application pods in a Kubernetes cluster.",
    long_about = "Dendrite is a command-line convenience tool for application pods in a \
                  Kubernetes cluster: opening shells, opening a Rails console, reading and \
                  writing Secrets, detecting the deployed git branch, logging into the \
                  application's PostgreSQL database, and switching between stored kubeconfig \
                  environments.",
    color = clap::ColorChoice::Always
)]
pub struct Cli {
    /// The application to operate on.
    #[arg(
        short = 'a',
        long = "app",
        help = "Name of the application; pods are matched by the `app=<name>` label and the \
                application's Secret by the same name"
    )]
    app: Option<String>,

    #[arg(
        short = 'n',
        long = "namespace",
        help = "Kubernetes namespace to operate in. Defaults to the configured default namespace."
    )]
    namespace: Option<String>,

    /// The operation to perform.
    #[arg(short = 'm', long = "mode", value_enum, help = "Operation to perform")]
    mode: Option<Mode>,

    #[arg(
        short = 'e',
        long = "env-var",
        help = "Secret key to read (get-secret) or write (set-secret)"
    )]
    env_var: Option<String>,

    #[arg(short = 'v', long = "value", help = "Value to store with set-secret")]
    value: Option<String>,

    /// Everything after the flags is handed to the pod's shell (bash mode).
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command to run in the pod instead of an interactive shell (bash mode only)"
    )]
    command: Vec<String>,

    #[arg(
        long = "completions",
        value_name = "SHELL",
        help = "Generate a shell completion script for the specified shell (bash, zsh, fish)"
    )]
    completions: Option<clap_complete::Shell>,

    /// Path to the configuration file.
    #[arg(
        long = "config",
        short = 'c',
        env = "DENDRITE_CONFIG_FILE_PATH",
        help = "Specify a configuration file. Defaults to ~/.config/dendrite/config.yaml or \
                DENDRITE_CONFIG_FILE_PATH env var."
    )]
    config_file: Option<PathBuf>,

    #[arg(
        long = "log-level",
        env = "DENDRITE_LOG_LEVEL",
        help = "Set the logging level (e.g., info, debug, trace)."
    )]
    log_level: Option<tracing::Level>,
}

/// The closed set of operations Dendrite supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Mode {
    /// Interactive shell, or a one-off command when trailing tokens are given.
    Bash,
    /// Interactive Rails console.
    Rails,
    /// Print one entry of the application's Secret.
    GetSecret,
    /// Store an entry in the application's Secret.
    SetSecret,
    /// Select a stored kubeconfig environment and make it active.
    SwitchEnv,
    /// Print the current context of the active kubeconfig.
    VerifyEnv,
    /// Print the remote branch containing the deployed HEAD.
    GetBranch,
    /// Open a psql session using credentials from the application's Secret.
    PostgresLogin,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bash => "bash",
            Self::Rails => "rails",
            Self::GetSecret => "get-secret",
            Self::SetSecret => "set-secret",
            Self::SwitchEnv => "switch-env",
            Self::VerifyEnv => "verify-env",
            Self::GetBranch => "get-branch",
            Self::PostgresLogin => "postgres-login",
        };
        f.write_str(name)
    }
}

/// A fully validated invocation: one variant per mode, carrying exactly the
/// fields that mode requires.
enum Request {
    Shell(ShellCommand),
    Rails(RailsCommand),
    GetSecret(GetSecretCommand),
    SetSecret(SetSecretCommand),
    GetBranch(GetBranchCommand),
    PostgresLogin(PostgresLoginCommand),
    SwitchEnv,
    VerifyEnv,
}

impl Request {
    /// Applies the per-mode mandatory-field rules. Runs before any external
    /// call, so a bad invocation never touches the cluster.
    fn build(mode: Mode, cli: &Cli, default_namespace: &str) -> Result<Self, Error> {
        let namespace = cli
            .namespace
            .clone()
            .filter(|namespace| !namespace.is_empty())
            .unwrap_or_else(|| default_namespace.to_string());

        let require_app = || {
            cli.app
                .clone()
                .filter(|app| !app.is_empty())
                .context(error::MissingAppSnafu { mode: mode.to_string() })
        };
        let require_key = || {
            cli.env_var
                .clone()
                .filter(|key| !key.is_empty())
                .context(error::MissingSecretKeySnafu { mode: mode.to_string() })
        };

        let request = match mode {
            Mode::Bash => Self::Shell(ShellCommand {
                app: require_app()?,
                namespace,
                command: cli.command.clone(),
            }),
            Mode::Rails => Self::Rails(RailsCommand { app: require_app()?, namespace }),
            Mode::GetSecret => Self::GetSecret(GetSecretCommand {
                app: require_app()?,
                namespace,
                key: require_key()?,
            }),
            Mode::SetSecret => Self::SetSecret(SetSecretCommand {
                app: require_app()?,
                namespace,
                key: require_key()?,
                value: cli
                    .value
                    .clone()
                    .filter(|value| !value.is_empty())
                    .context(error::MissingSecretValueSnafu)?,
            }),
            Mode::GetBranch => Self::GetBranch(GetBranchCommand { app: require_app()?, namespace }),
            Mode::PostgresLogin => {
                Self::PostgresLogin(PostgresLoginCommand { app: require_app()?, namespace })
            }
            Mode::SwitchEnv => Self::SwitchEnv,
            Mode::VerifyEnv => Self::VerifyEnv,
        };
        Ok(request)
    }
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    fn load_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config_file {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };

        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }

        Ok(config)
    }

    /// Executes the invocation and returns the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an `Error` for validation failures, an unresolvable pod,
    /// missing Secret entries or credentials, or any failing call against
    /// the cluster. All errors are terminal for the invocation.
    pub fn run(self) -> Result<i32, Error> {
        if let Some(shell) = self.completions {
            let mut app = Self::command();
            let bin_name = app.get_name().to_string();
            clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
            return Ok(0);
        }

        let Some(mode) = self.mode else {
            let help = Self::command().render_long_help().ansi().to_string();
            std::io::stderr().write_all(help.as_bytes()).context(error::WriteStderrSnafu)?;
            return Ok(1);
        };

        let config = self.load_config()?;
        config.log.registry();

        let request = Request::build(mode, &self, &config.default_namespace)?;

        match request {
            Request::SwitchEnv => {
                KubeEnv::from_config(&config)?.switch()?;
                Ok(0)
            }
            Request::VerifyEnv => {
                KubeEnv::from_config(&config)?.verify()?;
                Ok(0)
            }
            request => {
                let fut = async move {
                    let kube_client =
                        kube::Client::try_default().await.context(error::KubeConfigSnafu)?;
                    match request {
                        Request::Shell(cmd) => cmd.run(kube_client).await,
                        Request::Rails(cmd) => cmd.run(kube_client).await,
                        Request::GetSecret(cmd) => cmd.run(kube_client).await,
                        Request::SetSecret(cmd) => cmd.run(kube_client).await,
                        Request::GetBranch(cmd) => cmd.run(kube_client).await,
                        Request::PostgresLogin(cmd) => cmd.run(kube_client).await,
                        // Environment modes were dispatched without a client.
                        Request::SwitchEnv | Request::VerifyEnv => Ok(0),
                    }
                };
                Runtime::new().context(error::InitializeTokioRuntimeSnafu)?.block_on(fut)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dendrite").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn unknown_mode_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["dendrite", "-m", "get-env"]).is_err());
        assert!(Cli::try_parse_from(["dendrite", "-m", "console"]).is_err());
    }

    #[rstest]
    #[case::bash(Mode::Bash)]
    #[case::rails(Mode::Rails)]
    #[case::get_secret(Mode::GetSecret)]
    #[case::set_secret(Mode::SetSecret)]
    #[case::get_branch(Mode::GetBranch)]
    #[case::postgres_login(Mode::PostgresLogin)]
    fn app_is_mandatory_for_pod_modes(#[case] mode: Mode) {
        let cli = parse(&[]);
        assert!(matches!(Request::build(mode, &cli, "default"), Err(Error::MissingApp { .. })));
    }

    #[test]
    fn get_secret_requires_a_key() {
        let cli = parse(&["-a", "billing"]);
        assert!(matches!(
            Request::build(Mode::GetSecret, &cli, "default"),
            Err(Error::MissingSecretKey { .. })
        ));
    }

    #[test]
    fn set_secret_requires_key_and_value() {
        let cli = parse(&["-a", "billing", "-e", "API_KEY"]);
        assert!(matches!(
            Request::build(Mode::SetSecret, &cli, "default"),
            Err(Error::MissingSecretValue)
        ));

        let cli = parse(&["-a", "billing", "-e", "API_KEY", "-v", "xyz"]);
        assert!(Request::build(Mode::SetSecret, &cli, "default").is_ok());
    }

    #[test]
    fn environment_modes_need_no_app() {
        let cli = parse(&[]);
        assert!(matches!(Request::build(Mode::SwitchEnv, &cli, "default"), Ok(Request::SwitchEnv)));
        assert!(matches!(Request::build(Mode::VerifyEnv, &cli, "default"), Ok(Request::VerifyEnv)));
    }

    #[test]
    fn namespace_falls_back_to_the_configured_default() {
        let cli = parse(&["-a", "billing"]);
        let Ok(Request::Rails(command)) = Request::build(Mode::Rails, &cli, "staging") else {
            panic!("expected a rails request");
        };
        assert_eq!(command.namespace, "staging");

        let cli = parse(&["-a", "billing", "-n", "web"]);
        let Ok(Request::Rails(command)) = Request::build(Mode::Rails, &cli, "staging") else {
            panic!("expected a rails request");
        };
        assert_eq!(command.namespace, "web");
    }

    #[test]
    fn trailing_tokens_become_the_bash_command() {
        let cli = parse(&["-a", "billing", "-m", "bash", "ls", "-la", "/app"]);
        let Ok(Request::Shell(command)) = Request::build(Mode::Bash, &cli, "default") else {
            panic!("expected a shell request");
        };
        assert_eq!(command.command, vec!["ls", "-la", "/app"]);
    }

    #[test]
    fn stderr_write_failures_name_the_stream() {
        let err = Error::WriteStderr { source: std::io::Error::other("stream closed") };
        assert_eq!(err.to_string(), "Failed to write to stderr, error: stream closed");
    }

    #[rstest]
    #[case::bash(Mode::Bash, "bash")]
    #[case::get_secret(Mode::GetSecret, "get-secret")]
    #[case::switch_env(Mode::SwitchEnv, "switch-env")]
    #[case::postgres_login(Mode::PostgresLogin, "postgres-login")]
    fn mode_names_render_kebab_case(#[case] mode: Mode, #[case] expected: &str) {
        assert_eq!(mode.to_string(), expected);
    }
}
