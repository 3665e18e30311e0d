//! Resource materialization.
//!
//! Copies the directories a module ships (behavior extensions, hooks, static
//! assets, tenant content) from its installed root into the shared global and
//! per-tenant namespaces. Copies replace the destination, so running one twice
//! over the same source yields the same tree.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

use modhost_protocols::{ModuleError, PathResolver};

use crate::paths::HostPaths;

/// Globally materialized resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    /// Behavior extensions, copied to `{data}/actions/{module}`.
    Actions,
    /// Lifecycle hooks, copied per hook type to `{data}/hooks/{type}/{module}`.
    Hooks,
    /// Static assets, copied to `{assets}/modules/{module}`.
    Assets,
}

impl ResourceCategory {
    /// Categories materialized once a module is ready, in order.
    pub const GLOBAL: [ResourceCategory; 3] = [Self::Actions, Self::Hooks, Self::Assets];

    /// Source directory relative to the module's installed root.
    pub fn source_subdir(self) -> &'static str {
        match self {
            Self::Actions => "dist/actions",
            Self::Hooks => "dist/hooks",
            Self::Assets => "assets",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Actions => "actions",
            Self::Hooks => "hooks",
            Self::Assets => "assets",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    Copied { files: usize },
    /// The module does not ship this kind of resource.
    NoSource,
}

const TENANT_SOURCE: &str = "tenant";
const TENANT_CATEGORY: &str = "tenant resources";

/// Copies module resources out of installed module directories.
#[derive(Clone)]
pub struct ResourceMaterializer {
    paths: HostPaths,
    resolver: Arc<dyn PathResolver>,
}

impl ResourceMaterializer {
    pub fn new(paths: HostPaths, resolver: Arc<dyn PathResolver>) -> Self {
        Self { paths, resolver }
    }

    pub fn paths(&self) -> &HostPaths {
        &self.paths
    }

    /// Materialize one category of a module into the global namespace.
    ///
    /// The installed root is resolved on every call.
    pub async fn materialize(
        &self,
        module: &str,
        category: ResourceCategory,
    ) -> Result<MaterializeOutcome, ModuleError> {
        let root = self.resolver.resolve_module_root(module).await?;
        let source = root.join(category.source_subdir());
        let paths = self.paths.clone();
        let name = module.to_string();

        run_blocking(module, category.as_str(), move || match category {
            ResourceCategory::Actions => copy_if_present(&source, &paths.actions_dir(&name)),
            ResourceCategory::Assets => copy_if_present(&source, &paths.assets_dir(&name)),
            ResourceCategory::Hooks => copy_hooks(&source, &paths, &name),
        })
        .await
    }

    /// Materialize a module's tenant content into `{tenants}/{tenant}/modules/{module}`.
    pub async fn materialize_tenant(
        &self,
        module: &str,
        tenant_id: &str,
        module_root: &Path,
    ) -> Result<MaterializeOutcome, ModuleError> {
        let source = module_root.join(TENANT_SOURCE);
        let destination = self.paths.tenant_module_dir(tenant_id, module);

        run_blocking(module, TENANT_CATEGORY, move || {
            copy_if_present(&source, &destination)
        })
        .await
    }
}

async fn run_blocking<F>(
    module: &str,
    category: &str,
    copy: F,
) -> Result<MaterializeOutcome, ModuleError>
where
    F: FnOnce() -> io::Result<MaterializeOutcome> + Send + 'static,
{
    let materialization_error = |source: io::Error| ModuleError::Materialization {
        module: module.to_string(),
        category: category.to_string(),
        source,
    };

    tokio::task::spawn_blocking(copy)
        .await
        .map_err(|e| materialization_error(io::Error::other(e)))?
        .map_err(materialization_error)
}

fn copy_if_present(source: &Path, destination: &Path) -> io::Result<MaterializeOutcome> {
    if !source.is_dir() {
        return Ok(MaterializeOutcome::NoSource);
    }
    let files = replace_tree(source, destination)?;
    Ok(MaterializeOutcome::Copied { files })
}

/// Every subdirectory of the hooks source is a hook type.
fn copy_hooks(source: &Path, paths: &HostPaths, module: &str) -> io::Result<MaterializeOutcome> {
    if !source.is_dir() {
        return Ok(MaterializeOutcome::NoSource);
    }

    let mut files = 0;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            debug!(path = %entry.path().display(), "Ignoring file outside of a hook type directory");
            continue;
        }
        let hook_type = entry.file_name();
        let destination = paths.hooks_dir(&hook_type.to_string_lossy(), module);
        files += replace_tree(&entry.path(), &destination)?;
    }
    Ok(MaterializeOutcome::Copied { files })
}

/// Replace `destination` with a copy of `source`, returning the number of files copied.
fn replace_tree(source: &Path, destination: &Path) -> io::Result<usize> {
    if destination.exists() {
        fs::remove_dir_all(destination)?;
    }
    fs::create_dir_all(destination)?;

    let mut files = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let target: PathBuf = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        files,
        "Copied module resources"
    );
    Ok(files)
}

#[cfg(test)]
#[path = "materializer_tests.rs"]
mod tests;
