use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use kube::{
    Api,
    api::{Patch, PatchParams},
};
use snafu::{OptionExt, ResultExt};
use tokio::io::AsyncWriteExt;

use crate::{
    cli::{Error, error},
    ext::SecretExt,
};

/// Prints a single entry of the application's Secret as `KEY=value`.
///
/// The key is looked up by exact match; a missing key is an error.
#[derive(Clone, Debug)]
pub struct GetSecretCommand {
    pub app: String,
    pub namespace: String,
    pub key: String,
}

impl GetSecretCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<i32, Error> {
        let Self { app, namespace, key } = self;

        let api = Api::<Secret>::namespaced(kube_client, &namespace);
        let secret = api.get(&app).await.with_context(|_| error::GetSecretSnafu {
            namespace: namespace.clone(),
            name: app.clone(),
        })?;

        let value = secret.decoded_value(&key).with_context(|| error::SecretKeyNotFoundSnafu {
            key: key.clone(),
            name: app.clone(),
        })?;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{key}={value}\n").as_bytes())
            .await
            .context(error::WriteStdoutSnafu)?;

        Ok(0)
    }
}

/// Stores a key/value pair in the application's Secret via a merge patch.
#[derive(Clone, Debug)]
pub struct SetSecretCommand {
    pub app: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl SetSecretCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<i32, Error> {
        let Self { app, namespace, key, value } = self;

        let api = Api::<Secret>::namespaced(kube_client, &namespace);

        // `stringData` lets the API server handle the base64 encoding.
        let patch = Secret {
            string_data: Some(BTreeMap::from([(key.clone(), value)])),
            ..Secret::default()
        };
        let _secret = api
            .patch(&app, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .with_context(|_| error::PatchSecretSnafu {
                namespace: namespace.clone(),
                name: app.clone(),
            })?;

        tracing::info!("Updated key '{key}' in secret '{app}'");

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("Secret '{app}' updated\n").as_bytes())
            .await
            .context(error::WriteStdoutSnafu)?;

        Ok(0)
    }
}
