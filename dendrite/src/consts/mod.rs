pub mod k8s;

use std::sync::LazyLock;

/// The namespace used when neither the command line nor the configuration
/// file provides one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Shell program used for both interactive sessions and one-off commands.
pub const SHELL_PROGRAM: &str = "/bin/bash";

/// The command used to open an interactive Rails console inside a pod.
pub static RAILS_CONSOLE_COMMAND: LazyLock<Vec<String>> = LazyLock::new(|| {
    vec!["bundle".to_string(), "exec".to_string(), "rails".to_string(), "console".to_string()]
});

/// The command used to query which remote branch contains the deployed HEAD.
pub static GIT_BRANCH_COMMAND: LazyLock<Vec<String>> = LazyLock::new(|| {
    vec![
        "git".to_string(),
        "branch".to_string(),
        "-r".to_string(),
        "--contains".to_string(),
        "HEAD".to_string(),
    ]
});
