use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    cli::{Error, error, internal::find_app_pod},
    consts,
    pod_console::PodConsole,
};

/// Reports which remote git branch contains the HEAD deployed in the
/// application pod.
#[derive(Clone, Debug)]
pub struct GetBranchCommand {
    pub app: String,
    pub namespace: String,
}

impl GetBranchCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<i32, Error> {
        let Self { app, namespace } = self;

        let (api, pod_name) = find_app_pod(kube_client, &app, &namespace).await?;

        let output =
            PodConsole::new(api, pod_name.clone(), namespace, consts::GIT_BRANCH_COMMAND.clone())
                .execute_captured()
                .await?;

        let branch = output.trim();
        if branch.is_empty() {
            return error::BranchNotFoundSnafu { pod_name }.fail();
        }

        let mut stdout = tokio::io::stdout();
        stdout.write_all(branch.as_bytes()).await.context(error::WriteStdoutSnafu)?;
        stdout.write_u8(b'\n').await.context(error::WriteStdoutSnafu)?;

        Ok(0)
    }
}
