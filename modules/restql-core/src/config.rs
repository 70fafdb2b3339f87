use serde::Deserialize;

/// Settings for the REST bridge. Every field has a default, so an empty
/// `[rest]` table (or none at all) yields a working bridge.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Prepended to every generated path, e.g. `/api` gives `/api/{field}`.
    pub path_prefix: String,
    pub relay: RelayConfig,
}

/// Names used to recognize relay-style node and connection types.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub node_interface: String,
    pub id_field: String,
    pub id_argument: String,
    pub connection_suffix: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            node_interface: "Node".to_string(),
            id_field: "id".to_string(),
            id_argument: "id".to_string(),
            connection_suffix: "Connection".to_string(),
        }
    }
}

impl BridgeConfig {
    /// HTTP path bound to a root field.
    pub fn route_path(&self, field_name: &str) -> String {
        let prefix = self.path_prefix.trim_end_matches('/');
        if prefix.is_empty() || prefix.starts_with('/') {
            format!("{prefix}/{field_name}")
        } else {
            format!("/{prefix}/{field_name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_sit_at_the_root() {
        let config = BridgeConfig::default();
        assert_eq!(config.route_path("hello"), "/hello");
    }

    #[test]
    fn prefix_is_normalized() {
        let mut config = BridgeConfig::default();
        config.path_prefix = "api/".to_string();
        assert_eq!(config.route_path("books"), "/api/books");

        config.path_prefix = "/v1".to_string();
        assert_eq!(config.route_path("books"), "/v1/books");
    }
}
