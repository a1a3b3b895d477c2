use k8s_openapi::api::core::v1::Pod;
use kube::{Api, api::ListParams};
use snafu::{OptionExt, ResultExt};

use crate::{
    cli::{Error, error},
    consts::k8s::labels,
};

/// Resolves the pod backing an application by its `app=<name>` label.
///
/// A single point-in-time query: the first matching pod is taken, and a
/// missing match is an error. No retry, no wait-for-ready.
pub async fn find_app_pod(
    kube_client: kube::Client,
    app: &str,
    namespace: &str,
) -> Result<(Api<Pod>, String), Error> {
    let api = Api::<Pod>::namespaced(kube_client, namespace);

    let params = ListParams::default().labels(&format!("{}={app}", labels::APP));
    let pods = api.list(&params).await.with_context(|_| error::ListPodsSnafu {
        app: app.to_string(),
        namespace: namespace.to_string(),
    })?;

    let pod_name = pods
        .items
        .into_iter()
        .find_map(|pod| pod.metadata.name)
        .with_context(|| error::PodNotFoundSnafu {
            app: app.to_string(),
            namespace: namespace.to_string(),
        })?;

    tracing::debug!("Resolved app '{app}' to pod '{pod_name}' in namespace {namespace}");
    Ok((api, pod_name))
}
