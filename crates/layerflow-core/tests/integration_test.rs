//! End-to-end tests: configuration folders in, executed graphs out.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tempfile::TempDir;

use layerflow_core::{Resolver, ResolverBuilder, record};
use layerflow_protocols::{
    Category, Component, Divider, FlowContext, Handler, Instance, Named, Resolve, ResolveError,
};

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Default, Deserialize)]
struct StepConf {
    #[serde(default)]
    name: String,
    #[serde(default = "default_true")]
    result: bool,
}

fn default_true() -> bool {
    true
}

/// Leaf that appends its name to the `trail` list in the context.
#[derive(Default)]
struct StepHandler {
    name: String,
    result: bool,
}

impl Named for StepHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for StepHandler {
    async fn handle(&self, ctx: &FlowContext) -> bool {
        let mut trail: Vec<String> = ctx.get("trail").unwrap_or_default();
        trail.push(self.name.clone());
        ctx.set("trail", trail);
        self.result
    }
}

impl Component for StepHandler {
    fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
        let conf: StepConf = record::decode(raw, "StepHandler")?;
        self.name = conf.name;
        self.result = conf.result;
        Ok(())
    }

    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Handler(Arc::new(*self))
    }
}

/// Divider routing on the `region` context key.
#[derive(Default)]
struct RegionDivider;

impl Named for RegionDivider {
    fn name(&self) -> &str {
        "RegionDivider"
    }
}

impl Divider for RegionDivider {
    fn select(&self, ctx: &FlowContext) -> String {
        ctx.get::<String>("region").unwrap_or_default()
    }
}

impl Component for RegionDivider {
    fn into_instance(self: Box<Self>) -> Instance {
        Instance::Divider(Arc::new(*self))
    }
}

fn write(root: &Path, file: &str, body: &str) {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn step(name: &str, result: bool) -> String {
    format!("type: StepHandler\nname: {name}\nresult: {result}\n")
}

fn build(root: &Path) -> Resolver {
    ResolverBuilder::new()
        .register_type::<StepHandler>("StepHandler")
        .register_type::<RegionDivider>("RegionDivider")
        .conf_dir(root)
        .build()
        .unwrap()
}

fn trail(ctx: &FlowContext) -> Vec<String> {
    ctx.get("trail").unwrap_or_default()
}

/// A mixed graph: a layer center over a routed layer, a handler group and an
/// async fan-out.
fn mixed_graph(root: &Path) {
    write(root, "center/main.yaml", "type: LayerCenter\nname: main\nlayers: [region_layer, checks, fan_out]\n");
    write(
        root,
        "layers/region_layer.yaml",
        "type: Layer\nname: region_layer\ndivider: RegionDivider\nhandlers: [eu, us]\n",
    );
    write(root, "groups/checks.yaml", "type: HandlerGroup\nname: checks\nhandlers: [audit, quota]\n");
    write(root, "groups/fan_out.yaml", "type: AsyncHandlerGroup\nname: fan_out\nhandlers: [notify, archive]\n");
    for (name, result) in [
        ("eu", true),
        ("us", false),
        ("audit", true),
        ("quota", true),
        ("notify", true),
        ("archive", true),
    ] {
        write(root, &format!("leaves/{name}.yaml"), &step(name, result));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_mixed_graph_success() {
    let dir = TempDir::new().unwrap();
    mixed_graph(dir.path());
    let resolver = build(dir.path());

    let main = resolver.resolve_handler("main").unwrap();
    let ctx = FlowContext::new();
    ctx.set("region", "eu");
    assert!(main.handle(&ctx).await);

    let trail = trail(&ctx);
    assert_eq!(&trail[..3], &["eu", "audit", "quota"]);
    assert_eq!(trail.len(), 5);

    assert_eq!(resolver.names(Category::LayerCenter), vec!["main"]);
    assert_eq!(resolver.names(Category::Layer), vec!["region_layer"]);
    assert_eq!(resolver.names(Category::Divider), vec!["RegionDivider"]);
    assert_eq!(resolver.names(Category::HandlerGroup), vec!["checks"]);
    assert_eq!(resolver.names(Category::AsyncHandlerGroup), vec!["fan_out"]);
}

#[tokio::test]
async fn test_mixed_graph_routing_failure_stops_center() {
    let dir = TempDir::new().unwrap();
    mixed_graph(dir.path());
    let resolver = build(dir.path());

    let main = resolver.resolve_handler("main").unwrap();

    let ctx = FlowContext::new();
    ctx.set("region", "us");
    assert!(!main.handle(&ctx).await);
    assert_eq!(trail(&ctx), vec!["us"]);

    let ctx = FlowContext::new();
    ctx.set("region", "apac");
    assert!(!main.handle(&ctx).await);
    assert!(trail(&ctx).is_empty());
}

#[tokio::test]
async fn test_fan_out_runs_everything() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "fan.yaml", "type: AsyncHandlerGroup\nname: fan\nhandlers: [a, b]\n");
    write(dir.path(), "a.yaml", &step("a", true));
    write(dir.path(), "b.yaml", &step("b", false));
    let resolver = build(dir.path());

    let fan = resolver.resolve_handler("fan").unwrap();
    let ctx = FlowContext::new();
    assert!(!fan.handle(&ctx).await);

    let mut trail = trail(&ctx);
    trail.sort();
    assert_eq!(trail, vec!["a", "b"]);
}

#[tokio::test]
async fn test_chain_fail_fast() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "chain.yaml", "type: HandlerGroup\nname: chain\nhandlers: [a, b, c]\n");
    write(dir.path(), "a.yaml", &step("a", true));
    write(dir.path(), "b.yaml", &step("b", false));
    write(dir.path(), "c.yaml", &step("c", true));
    let resolver = build(dir.path());

    let ctx = FlowContext::new();
    assert!(!resolver.resolve_handler("chain").unwrap().handle(&ctx).await);
    assert_eq!(trail(&ctx), vec!["a", "b"]);
}

#[tokio::test]
async fn test_show_duration_records_children() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "chain.yaml", "type: HandlerGroup\nname: chain\nhandlers: [a, b]\n");
    write(dir.path(), "a.yaml", &step("a", true));
    write(dir.path(), "b.yaml", &step("b", true));
    let resolver = build(dir.path());

    let ctx = FlowContext::new().show_duration(true);
    assert!(resolver.resolve_handler("chain").unwrap().handle(&ctx).await);
    let names: Vec<String> = ctx.durations().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_single_instance_per_name() {
    let dir = TempDir::new().unwrap();
    mixed_graph(dir.path());
    let resolver = build(dir.path());

    let first = resolver.resolve("audit").unwrap();
    resolver.materialize("main").unwrap();
    let second = resolver.resolve("audit").unwrap();
    assert!(first.same(&second));

    // Eleven components: center, layer, divider, two groups, six leaves.
    assert_eq!(resolver.types().instance_count(), 11);
}

#[test]
fn test_category_folders_with_object_folder() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "handlers/a.yaml", &step("a", true));
    write(dir.path(), "groups/chain.yaml", "type: HandlerGroup\nname: chain\nhandlers: [a]\n");

    let resolver = ResolverBuilder::new()
        .register_type::<StepHandler>("StepHandler")
        .category_folder(Category::Handler, dir.path().join("handlers"))
        .category_folder(Category::HandlerGroup, dir.path().join("groups"))
        .eager(true)
        .build()
        .unwrap();

    assert_eq!(resolver.names(Category::HandlerGroup), vec!["chain"]);
    assert_eq!(resolver.names(Category::Handler), vec!["a"]);
}

#[test]
fn test_cycle_is_an_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "outer.yaml", "type: LayerCenter\nname: outer\nlayers: [inner]\n");
    write(dir.path(), "inner.yaml", "type: HandlerGroup\nname: inner\nhandlers: [outer]\n");
    let resolver = build(dir.path());

    let err = resolver.materialize("outer").unwrap_err();
    assert!(matches!(err, ResolveError::Cycle(_)));
    assert!(!err.is_fatal());
    assert_eq!(err.to_string(), "Dependency cycle detected: outer -> inner -> outer");
}

#[test]
fn test_name_mismatch_in_nested_child() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "chain.yaml", "type: HandlerGroup\nname: chain\nhandlers: [a]\n");
    write(dir.path(), "a.yaml", &step("not_a", true));
    let resolver = build(dir.path());

    let err = resolver.materialize("chain").unwrap_err();
    assert!(matches!(err, ResolveError::NameMismatch { ref expected, .. } if expected == "a"));
}
