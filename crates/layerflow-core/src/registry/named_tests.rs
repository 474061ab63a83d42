    use super::*;
    use async_trait::async_trait;
    use layerflow_protocols::{Component, FlowContext, Named};
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    struct NoResolver;

    impl Resolve for NoResolver {
        fn materialize(&self, name: &str) -> Result<(), ResolveError> {
            Err(ResolveError::ObjectNameNotFound(name.to_string()))
        }

        fn lookup(&self, name: &str) -> Result<Instance, ResolveError> {
            Err(ResolveError::NotFound(name.to_string()))
        }
    }

    #[derive(Default, Deserialize)]
    struct LeafConf {
        #[serde(default)]
        name: String,
        #[serde(default)]
        result: bool,
    }

    #[derive(Default)]
    struct Leaf {
        name: String,
        result: bool,
    }

    impl Named for Leaf {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[async_trait]
    impl Handler for Leaf {
        async fn handle(&self, _ctx: &FlowContext) -> bool {
            self.result
        }
    }

    impl Component for Leaf {
        fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
            let conf: LeafConf = record::decode(raw, "Leaf")?;
            self.name = conf.name;
            self.result = conf.result;
            Ok(())
        }

        fn into_instance(self: Box<Self>) -> Instance {
            Instance::Handler(Arc::new(*self))
        }
    }

    #[derive(Default)]
    struct Route {
        name: String,
    }

    impl Named for Route {
        fn name(&self) -> &str {
            &self.name
        }
    }

    impl Divider for Route {
        fn select(&self, _ctx: &FlowContext) -> String {
            String::new()
        }
    }

    impl Component for Route {
        fn load_config(&mut self, raw: &[u8], _resolver: &dyn Resolve) -> Result<(), ResolveError> {
            let conf: LeafConf = record::decode(raw, "Route")?;
            self.name = conf.name;
            Ok(())
        }

        fn into_instance(self: Box<Self>) -> Instance {
            Instance::Divider(Arc::new(*self))
        }
    }

    fn types() -> TypeRegistry {
        let types = TypeRegistry::new();
        types.register_default::<Leaf>("Leaf").unwrap();
        types.register_default::<Route>("Route").unwrap();
        types
    }

    fn write(dir: &Path, file: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(file);
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_get_constructs_from_indexed_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ok_handler.yaml", "type: Leaf\nname: ok_handler\nresult: true\n");

        let types = types();
        let registry = HandlerRegistry::new(Category::Handler);
        assert_eq!(registry.index_folder(dir.path()).unwrap(), vec!["ok_handler"]);
        assert!(registry.contains("ok_handler"));
        assert!(registry.is_empty());

        let handler = registry.get("ok_handler", &types, &NoResolver).unwrap();
        assert!(handler.handle(&FlowContext::new()).await);
        assert_eq!(registry.names(), vec!["ok_handler"]);
    }

    #[test]
    fn test_get_is_cached() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "h.yaml", "type: Leaf\nname: h\n");

        let types = types();
        let registry = HandlerRegistry::new(Category::Handler);
        registry.index_folder(dir.path()).unwrap();

        let first = registry.get("h", &types, &NoResolver).unwrap();
        let second = registry.get("h", &types, &NoResolver).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(types.instance_count(), 1);
    }

    #[test]
    fn test_get_without_config() {
        let types = types();
        let registry = LayerRegistry::new(Category::Layer);
        let err = registry.get("missing", &types, &NoResolver).err().unwrap();
        assert_eq!(err.to_string(), "missing: Layer's configuration is not set");
    }

    #[test]
    fn test_get_name_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "foo.yaml", "type: Leaf\nname: bar\n");

        let types = types();
        let registry = HandlerRegistry::new(Category::Handler);
        registry.index_file(&path).unwrap();

        let err = registry.get("foo", &types, &NoResolver).err().unwrap();
        match err {
            ResolveError::NameMismatch {
                reported,
                expected,
                origin,
                ..
            } => {
                assert_eq!(reported, "bar");
                assert_eq!(expected, "foo");
                assert!(origin.ends_with("foo.yaml"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_get_missing_type() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "h.yaml", "name: h\n");

        let types = types();
        let registry = HandlerRegistry::new(Category::Handler);
        registry.index_folder(dir.path()).unwrap();

        let err = registry.get("h", &types, &NoResolver).err().unwrap();
        assert!(matches!(err, ResolveError::MissingType(_)));
    }

    #[test]
    fn test_get_capability_mismatch() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "route.yaml", "type: Route\nname: route\n");

        let types = types();
        let registry = HandlerRegistry::new(Category::Handler);
        registry.index_folder(dir.path()).unwrap();

        let err = registry.get("route", &types, &NoResolver).err().unwrap();
        assert!(matches!(
            err,
            ResolveError::CapabilityMismatch {
                expected: Category::Handler,
                ..
            }
        ));
    }

    #[test]
    fn test_divider_registry() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "route.yaml", "type: Route\nname: route\n");

        let types = types();
        let registry = DividerRegistry::new(Category::Divider);
        let divider = registry.create_with_conf_path(&path, &types, &NoResolver).unwrap();
        assert_eq!(divider.name(), "route");
        assert_eq!(divider.select(&FlowContext::new()), "");
    }

    #[test]
    fn test_load_folder_constructs_everything() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.yaml", "type: Leaf\nname: a\n");
        write(dir.path(), "b.yml", "type: Leaf\nname: b\n");

        let types = types();
        let registry = HandlerGroupRegistry::new(Category::HandlerGroup);
        let names = registry.load_folder(dir.path(), &types, &NoResolver).unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_manual() {
        let registry = HandlerRegistry::new(Category::Handler);
        let leaf: Arc<dyn Handler> = Arc::new(Leaf {
            name: "manual".to_string(),
            result: true,
        });

        registry.register("manual", leaf.clone()).unwrap();
        let err = registry.register("manual", leaf).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(registry.names(), vec!["manual"]);
    }

    #[test]
    fn test_register_instance_checks_capability() {
        let registry = DividerRegistry::new(Category::Divider);
        let instance = Instance::handler(Leaf::default());
        let err = registry.register_instance("leaf", &instance).unwrap_err();
        assert!(matches!(err, ResolveError::CapabilityMismatch { .. }));
        assert!(!registry.contains("leaf"));
    }

    #[test]
    fn test_reset_environment() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "h.yaml", "type: Leaf\nname: h\n");

        let types = types();
        let registry = AsyncHandlerGroupRegistry::new(Category::AsyncHandlerGroup);
        registry.load_folder(dir.path(), &types, &NoResolver).unwrap();
        assert!(registry.contains("h"));

        registry.reset_environment();
        assert!(!registry.contains("h"));
        assert!(registry.indexed_names().is_empty());
        assert!(registry.conf_path("h").is_none());
    }
