use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use kube::Api;
use snafu::{OptionExt, ResultExt};

use crate::{
    cli::{Error, error},
    consts::k8s::secret_keys,
    ext::SecretExt,
};

/// Opens an interactive `psql` session using credentials stored in the
/// application's Secret. The session's exit status becomes the tool's.
#[derive(Clone, Debug)]
pub struct PostgresLoginCommand {
    pub app: String,
    pub namespace: String,
}

impl PostgresLoginCommand {
    pub async fn run(self, kube_client: kube::Client) -> Result<i32, Error> {
        let Self { app, namespace } = self;

        let api = Api::<Secret>::namespaced(kube_client, &namespace);
        let secret = api.get(&app).await.with_context(|_| error::GetSecretSnafu {
            namespace: namespace.clone(),
            name: app.clone(),
        })?;

        let credentials = DatabaseCredentials::from_entries(&secret.decoded_entries())
            .with_context(|| error::DatabaseCredentialsNotFoundSnafu { name: app.clone() })?;

        credentials.login().await
    }
}

/// Database credentials assembled from an application's Secret.
#[derive(Clone, Debug, PartialEq, Eq)]
enum DatabaseCredentials {
    /// A single connection URL.
    Url(String),
    /// Discrete connection parameters.
    Discrete { database: String, host: String, password: String, port: String, user: String },
}

impl DatabaseCredentials {
    /// The connection URL is preferred; the discrete keys are only consulted
    /// when no URL is stored, and all five must be present.
    fn from_entries(entries: &BTreeMap<String, String>) -> Option<Self> {
        if let Some(url) = entries.get(secret_keys::DATABASE_URL) {
            return Some(Self::Url(url.clone()));
        }

        Some(Self::Discrete {
            database: entries.get(secret_keys::DATABASE_NAME)?.clone(),
            host: entries.get(secret_keys::DATABASE_HOST)?.clone(),
            password: entries.get(secret_keys::DATABASE_PASSWORD)?.clone(),
            port: entries.get(secret_keys::DATABASE_PORT)?.clone(),
            user: entries.get(secret_keys::DATABASE_USER)?.clone(),
        })
    }

    /// `psql` arguments. The password never appears here, it is passed via
    /// the `PGPASSWORD` environment variable.
    fn psql_args(&self) -> Vec<String> {
        match self {
            Self::Url(url) => vec![url.clone()],
            Self::Discrete { database, host, port, user, .. } => vec![
                "-h".to_string(),
                host.clone(),
                "-p".to_string(),
                port.clone(),
                "-U".to_string(),
                user.clone(),
                "-d".to_string(),
                database.clone(),
            ],
        }
    }

    async fn login(self) -> Result<i32, Error> {
        let mut command = tokio::process::Command::new("psql");
        let _unused = command.args(self.psql_args());
        if let Self::Discrete { password, .. } = &self {
            let _unused = command.env("PGPASSWORD", password);
        }

        let status = command.status().await.context(error::LaunchPsqlSnafu)?;
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
    }

    fn discrete_entries() -> BTreeMap<String, String> {
        entries(&[
            ("DATABASE_NAME", "billing"),
            ("DATABASE_HOST", "db.internal"),
            ("DATABASE_PASSWORD", "hunter2"),
            ("DATABASE_PORT", "5432"),
            ("DATABASE_USER", "billing_ro"),
        ])
    }

    #[test]
    fn connection_url_is_preferred_over_discrete_keys() {
        let mut all = discrete_entries();
        let _previous =
            all.insert("DATABASE_URL".to_string(), "postgres://u:p@h/db".to_string());

        assert_eq!(
            DatabaseCredentials::from_entries(&all),
            Some(DatabaseCredentials::Url("postgres://u:p@h/db".to_string()))
        );
    }

    #[test]
    fn discrete_keys_are_used_when_no_url_is_stored() {
        let credentials = DatabaseCredentials::from_entries(&discrete_entries()).unwrap();
        assert!(matches!(credentials, DatabaseCredentials::Discrete { .. }));
    }

    #[test]
    fn all_five_discrete_keys_are_required() {
        let mut incomplete = discrete_entries();
        let _removed = incomplete.remove("DATABASE_PORT");

        assert_eq!(DatabaseCredentials::from_entries(&incomplete), None);
    }

    #[test]
    fn no_credentials_in_unrelated_entries() {
        assert_eq!(
            DatabaseCredentials::from_entries(&entries(&[("API_KEY", "xyz")])),
            None
        );
    }

    #[test]
    fn url_credentials_produce_a_single_argument() {
        let credentials = DatabaseCredentials::Url("postgres://u:p@h/db".to_string());
        assert_eq!(credentials.psql_args(), vec!["postgres://u:p@h/db".to_string()]);
    }

    #[test]
    fn discrete_credentials_never_put_the_password_in_the_arguments() {
        let credentials = DatabaseCredentials::from_entries(&discrete_entries()).unwrap();
        let args = credentials.psql_args();
        assert_eq!(args, vec!["-h", "db.internal", "-p", "5432", "-U", "billing_ro", "-d", "billing"]);
        assert!(!args.iter().any(|arg| arg.contains("hunter2")));
    }
}
