use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;

/// Extension trait for [`Secret`] exposing its entries as plain strings.
pub trait SecretExt {
    /// Returns every entry of the Secret with values decoded to UTF-8
    /// strings. Entries from `stringData` take precedence over `data`,
    /// matching the merge semantics the API server applies on write.
    fn decoded_entries(&self) -> BTreeMap<String, String>;

    /// Looks up a single key by exact match.
    fn decoded_value(&self, key: &str) -> Option<String> {
        let mut entries = self.decoded_entries();
        entries.remove(key)
    }
}

impl SecretExt for Secret {
    fn decoded_entries(&self) -> BTreeMap<String, String> {
        let mut entries: BTreeMap<String, String> = self
            .data
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), String::from_utf8_lossy(&value.0).into_owned()))
            .collect();

        if let Some(string_data) = &self.string_data {
            entries.extend(string_data.clone());
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::ByteString;
    use pretty_assertions::assert_eq;

    use super::*;

    fn secret_with_data(entries: &[(&str, &[u8])]) -> Secret {
        Secret {
            data: Some(
                entries
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), ByteString(value.to_vec())))
                    .collect(),
            ),
            ..Secret::default()
        }
    }

    #[test]
    fn decoded_entries_decodes_all_data_values() {
        let secret = secret_with_data(&[("API_KEY", b"xyz"), ("OTHER", b"abc")]);

        let entries = secret.decoded_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("API_KEY").map(String::as_str), Some("xyz"));
        assert_eq!(entries.get("OTHER").map(String::as_str), Some("abc"));
    }

    #[test]
    fn decoded_value_matches_exact_key_only() {
        let secret = secret_with_data(&[("API_KEY", b"xyz"), ("API_KEY_SECONDARY", b"abc")]);

        assert_eq!(secret.decoded_value("API_KEY"), Some("xyz".to_string()));
        assert_eq!(secret.decoded_value("API"), None);
        assert_eq!(secret.decoded_value("KEY"), None);
    }

    #[test]
    fn string_data_takes_precedence_over_data() {
        let mut secret = secret_with_data(&[("API_KEY", b"old")]);
        secret.string_data =
            Some([("API_KEY".to_string(), "new".to_string())].into_iter().collect());

        assert_eq!(secret.decoded_value("API_KEY"), Some("new".to_string()));
    }

    #[test]
    fn empty_secret_has_no_entries() {
        let secret = Secret::default();
        assert!(secret.decoded_entries().is_empty());
        assert_eq!(secret.decoded_value("ANY"), None);
    }
}
