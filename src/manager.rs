//! # Service manager operations
//!
//! Install, uninstall, start and stop a service through the Service Control Manager.
//! These run in an administrator's process (an installer or a CLI), never inside the
//! service itself.
//!
//! Every failure surfaces as [`ServiceError::ManagerFailed`] naming the operation and
//! the service.

use crate::config::InstallConfig;
use crate::error::ServiceError;
use crate::model::StartType;
use std::ffi::OsString;
use tracing::{info, instrument};
use windows_service::service::{
    ServiceAccess, ServiceDependency, ServiceErrorControl, ServiceInfo, ServiceStartType,
    ServiceState, ServiceType,
};
use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

fn failed(
    operation: &'static str,
    name: &str,
) -> impl FnOnce(windows_service::Error) -> ServiceError + '_ {
    move |e| ServiceError::ManagerFailed {
        operation,
        name: name.to_string(),
        reason: e.to_string(),
    }
}

fn connect(
    operation: &'static str,
    name: &str,
    access: ServiceManagerAccess,
) -> Result<ServiceManager, ServiceError> {
    ServiceManager::local_computer(None::<&str>, access).map_err(failed(operation, name))
}

fn start_type(start_type: StartType) -> ServiceStartType {
    match start_type {
        StartType::BootStart => ServiceStartType::BootStart,
        StartType::AutoStart => ServiceStartType::AutoStart,
        StartType::DemandStart => ServiceStartType::OnDemand,
        StartType::Disabled => ServiceStartType::Disabled,
    }
}

/// Registers the current executable as an own-process service.
#[instrument(skip(config), fields(service = %config.name))]
pub fn install_service(config: &InstallConfig) -> Result<(), ServiceError> {
    const OP: &str = "Install";
    config.validate()?;
    let name = config.name.as_str();
    let executable_path = std::env::current_exe().map_err(|e| ServiceError::ManagerFailed {
        operation: OP,
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let info = ServiceInfo {
        name: OsString::from(name),
        display_name: OsString::from(config.display_name()),
        service_type: ServiceType::OWN_PROCESS,
        start_type: start_type(config.start_type),
        error_control: ServiceErrorControl::Normal,
        executable_path,
        launch_arguments: Vec::new(),
        dependencies: config
            .dependencies
            .iter()
            .map(|d| ServiceDependency::Service(OsString::from(d)))
            .collect(),
        account_name: Some(OsString::from(&config.account)),
        account_password: (!config.password.is_empty()).then(|| OsString::from(&config.password)),
    };

    let manager = connect(
        OP,
        name,
        ServiceManagerAccess::CONNECT | ServiceManagerAccess::CREATE_SERVICE,
    )?;
    manager
        .create_service(&info, ServiceAccess::QUERY_STATUS)
        .map_err(failed(OP, name))?;
    info!(start_type = %config.start_type, account = %config.account, "Service installed");
    Ok(())
}

/// Deletes the service. It must be stopped first.
#[instrument]
pub fn uninstall_service(name: &str) -> Result<(), ServiceError> {
    const OP: &str = "Uninstall";
    let manager = connect(OP, name, ServiceManagerAccess::CONNECT)?;
    let service = manager
        .open_service(name, ServiceAccess::QUERY_STATUS | ServiceAccess::DELETE)
        .map_err(failed(OP, name))?;
    let status = service.query_status().map_err(failed(OP, name))?;
    if status.current_state != ServiceState::Stopped {
        return Err(ServiceError::ManagerFailed {
            operation: OP,
            name: name.to_string(),
            reason: "service must be stopped before the uninstallation".into(),
        });
    }
    service.delete().map_err(failed(OP, name))?;
    info!("Service uninstalled");
    Ok(())
}

/// Asks the SCM to start the service. Returns once the request is accepted.
#[instrument]
pub fn start_service(name: &str) -> Result<(), ServiceError> {
    const OP: &str = "Start";
    let manager = connect(OP, name, ServiceManagerAccess::CONNECT)?;
    let service = manager
        .open_service(name, ServiceAccess::START)
        .map_err(failed(OP, name))?;
    service
        .start(&[] as &[&std::ffi::OsStr])
        .map_err(failed(OP, name))?;
    info!("Start requested");
    Ok(())
}

/// Sends the stop control to the service.
#[instrument]
pub fn stop_service(name: &str) -> Result<(), ServiceError> {
    const OP: &str = "Stop";
    let manager = connect(OP, name, ServiceManagerAccess::CONNECT)?;
    let service = manager
        .open_service(name, ServiceAccess::STOP)
        .map_err(failed(OP, name))?;
    service.stop().map_err(failed(OP, name))?;
    info!("Stop requested");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_type_mapping() {
        assert_eq!(start_type(StartType::BootStart), ServiceStartType::BootStart);
        assert_eq!(start_type(StartType::AutoStart), ServiceStartType::AutoStart);
        assert_eq!(start_type(StartType::DemandStart), ServiceStartType::OnDemand);
        assert_eq!(start_type(StartType::Disabled), ServiceStartType::Disabled);
    }

    #[test]
    fn test_invalid_config_fails_before_touching_the_scm() {
        let err = install_service(&InstallConfig::new("")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidConfiguration(_)));
    }
}
