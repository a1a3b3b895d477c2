use crate::{
    cli::{Error, internal::find_app_pod},
    consts,
    pod_console::PodConsole,
};

/// Opens an interactive Rails console in the application pod.
#[derive(Clone, Debug)]
pub struct RailsCommand {
    pub app: String,
    pub namespace: String,
}

impl RailsCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<i32, Error> {
        let Self { app, namespace } = self;

        let (api, pod_name) = find_app_pod(kube_client, &app, &namespace).await?;

        PodConsole::new(api, pod_name, namespace, consts::RAILS_CONSOLE_COMMAND.clone())
            .attach()
            .await?;

        Ok(0)
    }
}
