//! # Configuration
//!
//! Two small records:
//!
//! - [`RuntimeOptions`] tune the running controller.
//! - [`InstallConfig`] describes how the service manager should register the service.
//!   It is serde-friendly so installers can read it from a JSON or TOML file; only
//!   `name` is required.
//!
//! ```json
//! { "name": "foo", "start_type": "SERVICE_DEMAND_START", "dependencies": ["Tcpip"] }
//! ```

use crate::error::ServiceError;
use crate::model::StartType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Account a service runs under unless configured otherwise.
pub const DEFAULT_ACCOUNT: &str = "NT AUTHORITY\\LocalService";

/// Options for [`ServiceRuntime`](crate::lifecycle::ServiceRuntime).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Sent with every status report; tells the supervisor how long the next pending
    /// step may take.
    pub wait_hint: Duration,
}

/// Registration parameters for the service manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub start_type: StartType,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}

impl InstallConfig {
    /// A configuration with every optional field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            account: default_account(),
            password: String::new(),
            start_type: StartType::default(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_start_type(mut self, start_type: StartType) -> Self {
        self.start_type = start_type;
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// The display name, falling back to the service name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Rejects configurations the service manager would refuse anyway.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::InvalidConfiguration(
                "service name must not be empty".into(),
            ));
        }
        if self.name.contains(['/', '\\']) {
            return Err(ServiceError::InvalidConfiguration(format!(
                "Invalid service name: [{}]",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: InstallConfig = serde_json::from_str(r#"{ "name": "foo" }"#).unwrap();

        assert_eq!(config, InstallConfig::new("foo"));
        assert_eq!(config.display_name(), "foo");
        assert_eq!(config.account, "NT AUTHORITY\\LocalService");
        assert_eq!(config.password, "");
        assert_eq!(config.start_type, StartType::AutoStart);
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: InstallConfig = serde_json::from_str(
            r#"{
                "name": "foo",
                "display_name": "Foo Service",
                "account": "LocalSystem",
                "start_type": "SERVICE_DEMAND_START",
                "dependencies": ["Tcpip", "Dnscache"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.display_name(), "Foo Service");
        assert_eq!(config.account, "LocalSystem");
        assert_eq!(config.start_type, StartType::DemandStart);
        assert_eq!(config.dependencies, vec!["Tcpip", "Dnscache"]);
    }

    #[test]
    fn test_unknown_start_type_is_rejected() {
        let err = serde_json::from_str::<InstallConfig>(
            r#"{ "name": "foo", "start_type": "SERVICE_SOMETIMES" }"#,
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid 'start_type' specified: [SERVICE_SOMETIMES]"));
    }

    #[test]
    fn test_start_type_serializes_as_constant_name() {
        let config = InstallConfig::new("foo").with_start_type(StartType::Disabled);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["start_type"], "SERVICE_DISABLED");
        assert!(json.get("display_name").is_none());
    }

    #[test]
    fn test_validate() {
        assert!(InstallConfig::new("foo").validate().is_ok());
        assert!(matches!(
            InstallConfig::new("  ").validate(),
            Err(ServiceError::InvalidConfiguration(_))
        ));
        assert!(InstallConfig::new("a\\b").validate().is_err());
    }
}
