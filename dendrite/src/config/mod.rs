mod error;
mod log;

use std::path::{Path, PathBuf};

use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{error::Error, log::LogConfig};
use crate::consts;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace used when `--namespace` is not given.
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Directory holding stored kubeconfig environment files.
    /// Defaults to `~/.kube/environments`.
    #[serde(default)]
    pub environments_dir: Option<PathBuf>,

    /// The active kubeconfig file. Defaults to `$KUBECONFIG` or
    /// `~/.kube/config`.
    #[serde(default)]
    pub kubeconfig_path: Option<PathBuf>,

    #[serde(default = "LogConfig::default")]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            environments_dir: None,
            kubeconfig_path: None,
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn search_config_file_path() -> PathBuf {
        let paths = vec![Self::default_path()]
            .into_iter()
            .chain(crate::fallback_project_config_directories().into_iter().map(|mut path| {
                path.push(crate::CLI_CONFIG_NAME);
                path
            }))
            .collect::<Vec<_>>();
        for path in paths {
            let Ok(exists) = path.try_exists() else {
                continue;
            };
            if exists {
                return path;
            }
        }
        Self::default_path()
    }

    #[inline]
    pub fn default_path() -> PathBuf {
        [crate::PROJECT_CONFIG_DIR.to_path_buf(), PathBuf::from(crate::CLI_CONFIG_NAME)]
            .into_iter()
            .collect()
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let path =
                path.as_ref().try_resolve().map(|path| path.to_path_buf()).with_context(|_| {
                    error::ResolveFilePathSnafu { file_path: path.as_ref().to_path_buf() }
                })?;
            let data =
                std::fs::read(&path).context(error::OpenConfigSnafu { filename: path.clone() })?;
            serde_yaml::from_slice(&data).context(error::ParseConfigSnafu { filename: path })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }

    /// Loads the configuration from the first existing search path, or falls
    /// back to the built-in defaults when no configuration file exists.
    pub fn load_default() -> Result<Self, Error> {
        let path = Self::search_config_file_path();
        match path.try_exists() {
            Ok(true) => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

fn default_namespace() -> String { consts::DEFAULT_NAMESPACE.to_string() }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.environments_dir, None);
        assert_eq!(config.kubeconfig_path, None);
        assert_eq!(config.log.level, tracing::Level::INFO);
    }

    #[test]
    fn fields_are_camel_case() {
        let text = "
defaultNamespace: staging
environmentsDir: /etc/dendrite/environments
kubeconfigPath: /tmp/kubeconfig
log:
  level: debug
";
        let config: Config = serde_yaml::from_str(text).unwrap();
        assert_eq!(config.default_namespace, "staging");
        assert_eq!(
            config.environments_dir,
            Some(PathBuf::from("/etc/dendrite/environments"))
        );
        assert_eq!(config.kubeconfig_path, Some(PathBuf::from("/tmp/kubeconfig")));
        assert_eq!(config.log.level, tracing::Level::DEBUG);
    }
}
