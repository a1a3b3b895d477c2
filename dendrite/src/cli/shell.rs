use crate::{
    cli::{Error, internal::find_app_pod},
    consts,
    pod_console::PodConsole,
};

/// Opens an interactive shell in the application pod, or runs a one-off
/// command in it when trailing arguments were given.
#[derive(Clone, Debug)]
pub struct ShellCommand {
    pub app: String,
    pub namespace: String,
    pub command: Vec<String>,
}

impl ShellCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<i32, Error> {
        let Self { app, namespace, command } = self;

        let (api, pod_name) = find_app_pod(kube_client, &app, &namespace).await?;

        if command.is_empty() {
            PodConsole::new(api, pod_name, namespace, [consts::SHELL_PROGRAM])
                .attach()
                .await?;
        } else {
            // Trailing tokens are handed to the shell as a single script.
            let script = command.join(" ");
            PodConsole::new(api, pod_name, namespace, [consts::SHELL_PROGRAM, "-c", script.as_str()])
                .execute()
                .await?;
        }

        Ok(0)
    }
}
