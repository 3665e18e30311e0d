use super::*;
use async_trait::async_trait;
use tempfile::TempDir;

/// Resolves every module to `{root}/{module}`, failing for missing directories.
struct DirResolver {
    root: PathBuf,
}

#[async_trait]
impl PathResolver for DirResolver {
    async fn resolve_module_root(&self, module_name: &str) -> Result<PathBuf, ModuleError> {
        let dir = self.root.join(module_name);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(ModuleError::PathResolution {
                module: module_name.to_string(),
                message: "not installed".to_string(),
            })
        }
    }
}

struct Fixture {
    _tmp: TempDir,
    modules: PathBuf,
    paths: HostPaths,
    materializer: ResourceMaterializer,
}

fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let modules = tmp.path().join("modules");
    fs::create_dir_all(&modules).unwrap();
    let paths = HostPaths::new(
        tmp.path().join("data"),
        tmp.path().join("assets"),
        tmp.path().join("tenants"),
    );
    let materializer = ResourceMaterializer::new(
        paths.clone(),
        Arc::new(DirResolver {
            root: modules.clone(),
        }),
    );
    Fixture {
        _tmp: tmp,
        modules,
        paths,
        materializer,
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn tree(root: &Path) -> Vec<(String, String)> {
    let mut files: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().display().to_string();
            (relative, read(e.path()))
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_category_layout() {
    assert_eq!(ResourceCategory::Actions.source_subdir(), "dist/actions");
    assert_eq!(ResourceCategory::Hooks.source_subdir(), "dist/hooks");
    assert_eq!(ResourceCategory::Assets.source_subdir(), "assets");
    assert_eq!(ResourceCategory::Hooks.to_string(), "hooks");
    assert_eq!(ResourceCategory::GLOBAL.len(), 3);
}

#[tokio::test]
async fn test_actions_are_copied() {
    let f = fixture();
    write(&f.modules.join("echo/dist/actions/reply.js"), "reply");
    write(&f.modules.join("echo/dist/actions/nested/deep.js"), "deep");

    let outcome = f
        .materializer
        .materialize("echo", ResourceCategory::Actions)
        .await
        .unwrap();

    assert_eq!(outcome, MaterializeOutcome::Copied { files: 2 });
    let dest = f.paths.actions_dir("echo");
    assert_eq!(read(&dest.join("reply.js")), "reply");
    assert_eq!(read(&dest.join("nested/deep.js")), "deep");
}

#[tokio::test]
async fn test_missing_source_is_noop() {
    let f = fixture();
    fs::create_dir_all(f.modules.join("echo")).unwrap();

    for category in ResourceCategory::GLOBAL {
        let outcome = f.materializer.materialize("echo", category).await.unwrap();
        assert_eq!(outcome, MaterializeOutcome::NoSource);
    }
    assert!(!f.paths.actions_dir("echo").exists());
    assert!(!f.paths.assets_dir("echo").exists());
}

#[tokio::test]
async fn test_hooks_are_namespaced_per_module() {
    let f = fixture();
    write(&f.modules.join("echo/dist/hooks/after_incoming/log.js"), "echo-log");
    write(&f.modules.join("echo/dist/hooks/on_startup/init.js"), "echo-init");
    write(&f.modules.join("echo/dist/hooks/README.md"), "ignored");
    write(&f.modules.join("analytics/dist/hooks/after_incoming/log.js"), "analytics-log");

    let echo = f
        .materializer
        .materialize("echo", ResourceCategory::Hooks)
        .await
        .unwrap();
    f.materializer
        .materialize("analytics", ResourceCategory::Hooks)
        .await
        .unwrap();

    assert_eq!(echo, MaterializeOutcome::Copied { files: 2 });
    assert_eq!(
        read(&f.paths.hooks_dir("after_incoming", "echo").join("log.js")),
        "echo-log"
    );
    assert_eq!(
        read(&f.paths.hooks_dir("after_incoming", "analytics").join("log.js")),
        "analytics-log"
    );
    assert_eq!(
        read(&f.paths.hooks_dir("on_startup", "echo").join("init.js")),
        "echo-init"
    );
    assert!(!f.paths.hooks_root().join("README.md").exists());
}

#[tokio::test]
async fn test_assets_are_copied() {
    let f = fixture();
    write(&f.modules.join("echo/assets/icon.svg"), "<svg/>");

    f.materializer
        .materialize("echo", ResourceCategory::Assets)
        .await
        .unwrap();
    assert_eq!(read(&f.paths.assets_dir("echo").join("icon.svg")), "<svg/>");
}

#[tokio::test]
async fn test_materializing_twice_yields_identical_tree() {
    let f = fixture();
    write(&f.modules.join("echo/dist/actions/a.js"), "a");
    write(&f.modules.join("echo/dist/actions/sub/b.js"), "b");

    f.materializer
        .materialize("echo", ResourceCategory::Actions)
        .await
        .unwrap();
    let first = tree(&f.paths.actions_dir("echo"));

    f.materializer
        .materialize("echo", ResourceCategory::Actions)
        .await
        .unwrap();
    let second = tree(&f.paths.actions_dir("echo"));

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_stale_files_are_replaced() {
    let f = fixture();
    write(&f.modules.join("echo/dist/actions/a.js"), "v1");
    f.materializer
        .materialize("echo", ResourceCategory::Actions)
        .await
        .unwrap();

    fs::remove_file(f.modules.join("echo/dist/actions/a.js")).unwrap();
    write(&f.modules.join("echo/dist/actions/b.js"), "v2");
    f.materializer
        .materialize("echo", ResourceCategory::Actions)
        .await
        .unwrap();

    let dest = f.paths.actions_dir("echo");
    assert!(!dest.join("a.js").exists());
    assert_eq!(read(&dest.join("b.js")), "v2");
}

#[tokio::test]
async fn test_unresolvable_module_fails() {
    let f = fixture();
    let err = f
        .materializer
        .materialize("ghost", ResourceCategory::Actions)
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::PathResolution { .. }));
}

#[tokio::test]
async fn test_tenant_content() {
    let f = fixture();
    let root = f.modules.join("echo");
    write(&root.join("tenant/flows/main.flow.json"), "{}");

    let outcome = f
        .materializer
        .materialize_tenant("echo", "acme", &root)
        .await
        .unwrap();

    assert_eq!(outcome, MaterializeOutcome::Copied { files: 1 });
    assert_eq!(
        read(&f.paths.tenant_module_dir("acme", "echo").join("flows/main.flow.json")),
        "{}"
    );
}

#[tokio::test]
async fn test_tenant_content_missing_source() {
    let f = fixture();
    let root = f.modules.join("echo");
    fs::create_dir_all(&root).unwrap();

    let outcome = f
        .materializer
        .materialize_tenant("echo", "acme", &root)
        .await
        .unwrap();
    assert_eq!(outcome, MaterializeOutcome::NoSource);
    assert!(!f.paths.tenant_module_dir("acme", "echo").exists());
}
