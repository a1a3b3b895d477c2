use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Configuration { source: crate::config::Error },

    #[snafu(display("{source}"))]
    PodConsole { source: crate::pod_console::Error },

    #[snafu(display("{source}"))]
    KubeEnv { source: crate::kube_env::Error },

    #[snafu(display("Mode '{mode}' requires an application name, specify one with `--app`"))]
    MissingApp { mode: String },

    #[snafu(display("Mode '{mode}' requires a variable name, specify one with `--env-var`"))]
    MissingSecretKey { mode: String },

    #[snafu(display("Mode 'set-secret' requires a value, specify one with `--value`"))]
    MissingSecretValue,

    #[snafu(display("Failed to write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Failed to write to stderr, error: {source}"))]
    WriteStderr { source: std::io::Error },

    #[snafu(display("Failed to initialize Kubernetes client configuration, error: {source}"))]
    KubeConfig { source: kube::Error },

    #[snafu(display("Failed to create tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: std::io::Error },

    #[snafu(display(
        "Failed to list pods for app '{app}' in namespace {namespace}, error: {source}"
    ))]
    ListPods {
        app: String,
        namespace: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("No pod found for app '{app}' in namespace {namespace}"))]
    PodNotFound { app: String, namespace: String },

    #[snafu(display("Failed to get secret {name} in namespace {namespace}, error: {source}"))]
    GetSecret {
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to patch secret {name} in namespace {namespace}, error: {source}"))]
    PatchSecret {
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Key '{key}' not found in secret {name}"))]
    SecretKeyNotFound { key: String, name: String },

    #[snafu(display("No remote branch contains the HEAD deployed in pod {pod_name}"))]
    BranchNotFound { pod_name: String },

    #[snafu(display(
        "No database credentials found in secret {name}, expected either a connection URL or \
         discrete credential keys"
    ))]
    DatabaseCredentialsNotFound { name: String },

    #[snafu(display("Failed to launch psql, error: {source}"))]
    LaunchPsql { source: std::io::Error },
}

impl From<crate::config::Error> for Error {
    fn from(source: crate::config::Error) -> Self { Self::Configuration { source } }
}

impl From<crate::pod_console::Error> for Error {
    fn from(source: crate::pod_console::Error) -> Self { Self::PodConsole { source } }
}

impl From<crate::kube_env::Error> for Error {
    fn from(source: crate::kube_env::Error) -> Self { Self::KubeEnv { source } }
}
