use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When the supervisor launches an installed service.
///
/// Parsed from the supervisor's own constant names so configuration files can use the
/// same spelling as the platform documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StartType {
    BootStart,
    #[default]
    AutoStart,
    DemandStart,
    Disabled,
}

impl StartType {
    pub fn as_str(self) -> &'static str {
        match self {
            StartType::BootStart => "SERVICE_BOOT_START",
            StartType::AutoStart => "SERVICE_AUTO_START",
            StartType::DemandStart => "SERVICE_DEMAND_START",
            StartType::Disabled => "SERVICE_DISABLED",
        }
    }
}

impl FromStr for StartType {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVICE_BOOT_START" => Ok(StartType::BootStart),
            "SERVICE_AUTO_START" => Ok(StartType::AutoStart),
            "SERVICE_DEMAND_START" => Ok(StartType::DemandStart),
            "SERVICE_DISABLED" => Ok(StartType::Disabled),
            other => Err(ServiceError::InvalidConfiguration(format!(
                "Invalid 'start_type' specified: [{other}]"
            ))),
        }
    }
}

impl TryFrom<String> for StartType {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StartType> for String {
    fn from(value: StartType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_start_types() {
        assert_eq!("SERVICE_BOOT_START".parse::<StartType>().unwrap(), StartType::BootStart);
        assert_eq!("SERVICE_DEMAND_START".parse::<StartType>().unwrap(), StartType::DemandStart);
        assert_eq!("SERVICE_DISABLED".parse::<StartType>().unwrap(), StartType::Disabled);
        assert_eq!(StartType::default(), StartType::AutoStart);
    }

    #[test]
    fn test_unknown_start_type_is_invalid_configuration() {
        let err = "on_demand".parse::<StartType>().unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfiguration(_)));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Invalid 'start_type' specified: [on_demand]"
        );
    }
}
