//! Modules bundled with the modhost binary.

use serde_json::json;
use tracing::info;

use modhost_protocols::module::{SkillDeclaration, flow_generator, lifecycle_callback, tenant_callback};
use modhost_protocols::{BoxError, ModuleManifest};

/// Every module shipped with the binary, in load order.
pub(crate) fn bundled_modules() -> Vec<ModuleManifest> {
    vec![echo_module(), analytics_module()]
}

/// Replies with whatever it receives.
fn echo_module() -> ModuleManifest {
    ModuleManifest::new(json!({
        "name": "echo",
        "fullName": "Echo",
        "menuIcon": "message",
        "moduleView": { "stretched": true },
    }))
    .on_server_started(lifecycle_callback(|api| async move {
        let config = api.global_config().await?;
        info!(module = api.module_name(), %config, "Echo configured");
        Ok(())
    }))
    .on_server_ready(lifecycle_callback(|api| async move {
        info!(module = api.module_name(), "Echo ready");
        Ok(())
    }))
    .on_tenant_mount(tenant_callback(|api, tenant| async move {
        let config = api.tenant_config(&tenant).await?;
        let greeting = config
            .get("greeting")
            .and_then(|g| g.as_str())
            .unwrap_or("hello");
        info!(module = api.module_name(), %tenant, greeting, "Echo mounted");
        Ok(())
    }))
    .with_skill(
        SkillDeclaration::new("echo-reply", "Echo Reply").with_flow_generator(flow_generator(
            |data| async move {
                Ok(json!({
                    "nodes": [{ "type": "reply", "text": data }],
                }))
            },
        )),
    )
}

/// Headless module collecting per-tenant usage.
fn analytics_module() -> ModuleManifest {
    ModuleManifest::new(json!({
        "name": "analytics",
        "fullName": "Analytics",
        "noInterface": true,
    }))
    .on_server_started(lifecycle_callback(|_api| async { Ok(()) }))
    .on_server_ready(lifecycle_callback(|_api| async { Ok(()) }))
    .on_tenant_mount(tenant_callback(|api, tenant| async move {
        let config = api.tenant_config(&tenant).await?;
        if config.get("enabled").and_then(|e| e.as_bool()) == Some(false) {
            return Err::<(), BoxError>(format!("analytics disabled for tenant {tenant}").into());
        }
        Ok(())
    }))
    .on_tenant_unmount(tenant_callback(|api, tenant| async move {
        info!(module = api.module_name(), %tenant, "Analytics flushed");
        Ok(())
    }))
    .with_skill(
        SkillDeclaration::new("usage-report", "Usage Report").with_flow_generator(flow_generator(
            |data| async move {
                let period = data.get("period").cloned().unwrap_or_else(|| json!("week"));
                Ok(json!({
                    "nodes": [{ "type": "report", "period": period }],
                }))
            },
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_modules_are_named() {
        let names: Vec<_> = bundled_modules().iter().map(|m| m.label()).collect();
        assert_eq!(names, vec!["echo", "analytics"]);
    }

    #[tokio::test]
    async fn test_bundled_modules_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = modhost_config::Config {
            paths: modhost_config::PathsConfig::rooted_at(tmp.path()),
            ..Default::default()
        };
        let kernel = modhost_core::Kernel::from_config(&config);

        let started = kernel.load_modules(bundled_modules()).await.unwrap();
        assert_eq!(started, vec!["echo", "analytics"]);

        let flow = kernel
            .catalog()
            .generate_flow("echo", "echo-reply", json!("hi"))
            .await
            .unwrap();
        assert_eq!(flow["nodes"][0]["text"], "hi");

        let report = kernel
            .catalog()
            .generate_flow("analytics", "usage-report", json!({}))
            .await
            .unwrap();
        assert_eq!(report["nodes"][0]["period"], "week");
    }
}
