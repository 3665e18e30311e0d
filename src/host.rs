//! Host startup, tenant mounting and shutdown for modhost.

use std::sync::OnceLock;

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use modhost_config::{Config, ConfigValidator};
use modhost_core::Kernel;

use crate::register::bundled_modules;

/// Keeps the non-blocking file writer alive for the whole process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with console output and, when enabled, a daily-rolled log file.
///
/// `RUST_LOG` wins over `logging.level`. Console logs go to stderr so command
/// output on stdout stays machine-readable.
pub(crate) fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    let file_layer = if config.logging.file {
        let log_dir = &config.paths.log_dir;
        std::fs::create_dir_all(log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("modhost")
            .filename_suffix("log")
            .max_log_files(30)
            .build(log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = FILE_GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Run the host in foreground until Ctrl-C.
pub(crate) async fn run_host(
    config: &Config,
    tenants: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting modhost v{}", env!("CARGO_PKG_VERSION"));

    let kernel = Kernel::from_config(config);
    let started = kernel.load_modules(bundled_modules()).await?;
    info!(modules = ?started, "Modules started");

    kernel.start().await?;
    info!(
        data = %kernel.paths().global_data_root.display(),
        "Host running, press Ctrl-C to stop"
    );

    for tenant in tenants {
        let report = kernel.mount_tenant(tenant).await?;
        if !report.is_complete() {
            warn!(%tenant, failed = ?report.failed, "Some modules failed to mount");
        }
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    for tenant in tenants {
        match kernel.unmount_tenant(tenant).await {
            Ok(report) if !report.is_complete() => {
                warn!(%tenant, failed = ?report.failed, "Some modules failed to unmount");
            }
            Ok(_) => {}
            Err(e) => error!(%tenant, error = %e, "Tenant unmount failed"),
        }
    }

    kernel.stop().await?;
    Ok(())
}

/// Validate the configuration and print every finding.
pub(crate) fn check_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config)?;

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("Configuration is valid");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhost_config::PathsConfig;

    #[test]
    fn test_check_config_valid() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = Config {
            paths: PathsConfig::rooted_at(tmp.path()),
            ..Default::default()
        };
        assert!(check_config(&config).is_ok());
    }

    #[test]
    fn test_check_config_conflicting_modules() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = Config {
            paths: PathsConfig::rooted_at(tmp.path()),
            ..Default::default()
        };
        config.modules.enabled = vec!["echo".to_string()];
        config.modules.disabled = vec!["echo".to_string()];

        let err = check_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "1 configuration error(s)");
    }
}
