//! Stored kubeconfig environments.
//!
//! An environment is a YAML kubeconfig file kept in the environments
//! directory; switching makes a wholesale copy of it to the active
//! kubeconfig path. Nothing here talks to a cluster.

mod error;

use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use snafu::{OptionExt, ResultExt};

pub use self::error::Error;
use crate::config::Config;

/// A stored kubeconfig file that can be made the active one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub path: PathBuf,
}

pub struct KubeEnv {
    environments_dir: PathBuf,
    kubeconfig_path: PathBuf,
}

impl KubeEnv {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let environments_dir = match &config.environments_dir {
            Some(dir) => dir.clone(),
            None => default_environments_dir()?,
        };
        let kubeconfig_path = match &config.kubeconfig_path {
            Some(path) => path.clone(),
            None => default_kubeconfig_path()?,
        };
        Ok(Self { environments_dir, kubeconfig_path })
    }

    /// Interactively selects a stored environment and makes it active.
    ///
    /// The stored environments are printed as a numbered list; a selection
    /// outside the listed range is rejected and no file is copied.
    pub fn switch(&self) -> Result<(), Error> {
        let environments = list_environments(&self.environments_dir)?;

        let mut stdout = std::io::stdout().lock();
        for (index, environment) in environments.iter().enumerate() {
            writeln!(stdout, "{}) {}", index + 1, environment.name)
                .context(error::WriteStdoutSnafu)?;
        }
        write!(stdout, "Select an environment (1-{}): ", environments.len())
            .context(error::WriteStdoutSnafu)?;
        stdout.flush().context(error::WriteStdoutSnafu)?;

        let mut input = String::new();
        let _bytes = std::io::stdin()
            .lock()
            .read_line(&mut input)
            .context(error::ReadSelectionSnafu)?;

        let index = parse_selection(&input, environments.len()).with_context(|| {
            error::InvalidSelectionSnafu {
                input: input.trim().to_string(),
                count: environments.len(),
            }
        })?;
        let environment = &environments[index];

        self.switch_to(environment)?;
        writeln!(stdout, "Switched to environment '{}'", environment.name)
            .context(error::WriteStdoutSnafu)
    }

    fn switch_to(&self, environment: &Environment) -> Result<(), Error> {
        tracing::info!(
            "Copying {} to {}",
            environment.path.display(),
            self.kubeconfig_path.display()
        );
        let _bytes =
            fs::copy(&environment.path, &self.kubeconfig_path).with_context(|_| {
                error::CopyKubeconfigSnafu {
                    from: environment.path.clone(),
                    to: self.kubeconfig_path.clone(),
                }
            })?;
        Ok(())
    }

    /// Prints the current context name of the active kubeconfig.
    pub fn verify(&self) -> Result<(), Error> {
        let context = current_context(&self.kubeconfig_path)?;
        writeln!(std::io::stdout().lock(), "Current context: {context}")
            .context(error::WriteStdoutSnafu)
    }
}

fn current_context(path: &Path) -> Result<String, Error> {
    let kubeconfig = kube::config::Kubeconfig::read_from(path)
        .with_context(|_| error::ReadKubeconfigSnafu { path: path.to_path_buf() })?;
    kubeconfig
        .current_context
        .filter(|context| !context.is_empty())
        .with_context(|| error::CurrentContextNotSetSnafu { path: path.to_path_buf() })
}

fn default_environments_dir() -> Result<PathBuf, Error> {
    Ok(home_dir()?.join(".kube").join("environments"))
}

fn default_kubeconfig_path() -> Result<PathBuf, Error> {
    if let Some(path) = std::env::var_os("KUBECONFIG") {
        return Ok(PathBuf::from(path));
    }
    Ok(home_dir()?.join(".kube").join("config"))
}

fn home_dir() -> Result<PathBuf, Error> {
    let user_dirs = directories::UserDirs::new().context(error::HomeDirectorySnafu)?;
    Ok(user_dirs.home_dir().to_path_buf())
}

fn list_environments(dir: &Path) -> Result<Vec<Environment>, Error> {
    let entries = fs::read_dir(dir)
        .with_context(|_| error::ReadEnvironmentsDirSnafu { path: dir.to_path_buf() })?;

    let mut environments = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|_| error::ReadEnvironmentsDirSnafu { path: dir.to_path_buf() })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| matches!(extension, "yaml" | "yml"));
        if !path.is_file() || !is_yaml {
            continue;
        }
        let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
            continue;
        };
        environments.push(Environment { name, path });
    }

    if environments.is_empty() {
        return error::NoEnvironmentsSnafu { path: dir.to_path_buf() }.fail();
    }

    // Sorted by name so the numbering is stable between invocations.
    environments.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(environments)
}

/// Parses a 1-based selection against the number of listed environments,
/// returning the 0-based index.
fn parse_selection(input: &str, count: usize) -> Option<usize> {
    let choice = input.trim().parse::<usize>().ok()?;
    (1..=count).contains(&choice).then_some(choice - 1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir()
                .join(format!("dendrite-kube-env-{tag}-{}", std::process::id()));
            if path.exists() {
                fs::remove_dir_all(&path).unwrap();
            }
            fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        fn path(&self) -> &Path { &self.0 }
    }

    impl Drop for TempDir {
        fn drop(&mut self) { let _unused = fs::remove_dir_all(&self.0); }
    }

    #[rstest]
    #[case("1", 2, Some(0))]
    #[case("2", 2, Some(1))]
    #[case(" 2\n", 2, Some(1))]
    #[case("3", 2, None)]
    #[case("0", 2, None)]
    #[case("-1", 2, None)]
    #[case("abc", 2, None)]
    #[case("", 2, None)]
    fn selection_is_validated_against_the_listed_range(
        #[case] input: &str,
        #[case] count: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(parse_selection(input, count), expected);
    }

    #[test]
    fn environments_are_enumerated_sorted_by_name() {
        let dir = TempDir::new("enumerate");
        fs::write(dir.path().join("staging.yaml"), "staging").unwrap();
        fs::write(dir.path().join("prod.yaml"), "prod").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a kubeconfig").unwrap();

        let environments = list_environments(dir.path()).unwrap();
        let names: Vec<&str> =
            environments.iter().map(|environment| environment.name.as_str()).collect();
        assert_eq!(names, vec!["prod", "staging"]);
    }

    #[test]
    fn empty_environments_dir_is_an_error() {
        let dir = TempDir::new("empty");
        assert!(matches!(
            list_environments(dir.path()),
            Err(Error::NoEnvironments { .. })
        ));
    }

    #[test]
    fn missing_environments_dir_is_an_error() {
        let dir = TempDir::new("missing");
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(
            list_environments(&missing),
            Err(Error::ReadEnvironmentsDir { .. })
        ));
    }

    #[test]
    fn switching_copies_the_selected_environment() {
        let dir = TempDir::new("switch");
        let prod = dir.path().join("prod.yaml");
        fs::write(&prod, "apiVersion: v1\nkind: Config\ncurrent-context: prod\n").unwrap();

        let kube_env = KubeEnv {
            environments_dir: dir.path().to_path_buf(),
            kubeconfig_path: dir.path().join("active-config"),
        };
        kube_env
            .switch_to(&Environment { name: "prod".to_string(), path: prod.clone() })
            .unwrap();

        let active = fs::read_to_string(dir.path().join("active-config")).unwrap();
        assert_eq!(active, fs::read_to_string(prod).unwrap());
    }

    #[test]
    fn current_context_is_reported() {
        let dir = TempDir::new("verify");
        let kubeconfig = dir.path().join("config");
        fs::write(
            &kubeconfig,
            "apiVersion: v1\nkind: Config\ncurrent-context: staging\nclusters: []\ncontexts: \
             []\nusers: []\n",
        )
        .unwrap();

        assert_eq!(current_context(&kubeconfig).unwrap(), "staging");
    }

    #[test]
    fn unset_current_context_is_an_error() {
        let dir = TempDir::new("verify-unset");
        let kubeconfig = dir.path().join("config");
        fs::write(
            &kubeconfig,
            "apiVersion: v1\nkind: Config\nclusters: []\ncontexts: []\nusers: []\n",
        )
        .unwrap();

        assert!(matches!(
            current_context(&kubeconfig),
            Err(Error::CurrentContextNotSet { .. })
        ));
    }
}
