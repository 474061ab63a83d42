    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, file: &str) -> PathBuf {
        let path = dir.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "type: Handler\n").unwrap();
        path
    }

    #[test]
    fn test_conf_name() {
        assert_eq!(conf_name(Path::new("/conf/layer_a.yaml")).unwrap(), "layer_a");
        assert_eq!(conf_name(Path::new("main")).unwrap(), "main");
        assert_eq!(conf_name(Path::new("a.b.yml")).unwrap(), "a.b");
    }

    #[test]
    fn test_index_file() {
        let temp = TempDir::new().unwrap();
        let path = touch(temp.path(), "handler_a.yaml");

        let index = ConfigIndex::new();
        assert_eq!(index.index_file(&path).unwrap(), "handler_a");
        assert_eq!(index.path("handler_a"), Some(path));
        assert!(index.contains("handler_a"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_file_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let index = ConfigIndex::new();
        let err = index.index_file(temp.path()).unwrap_err();
        assert!(matches!(err, ResolveError::NotAFile(_)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_file_missing() {
        let index = ConfigIndex::new();
        let err = index.index_file(Path::new("/nonexistent/layerflow/a.yaml")).unwrap_err();
        assert!(matches!(err, ResolveError::Io { .. }));
    }

    #[test]
    fn test_index_file_twice_reports_both_paths() {
        let temp = TempDir::new().unwrap();
        let first = touch(temp.path(), "a/foo.yaml");
        let second = touch(temp.path(), "b/foo.yml");

        let index = ConfigIndex::new();
        index.index_file(&first).unwrap();
        let err = index.index_file(&second).unwrap_err();
        match err {
            ResolveError::DuplicateName {
                name,
                existing,
                conflicting,
            } => {
                assert_eq!(name, "foo");
                assert_eq!(existing, first);
                assert_eq!(conflicting, second);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(index.path("foo"), Some(first));
    }

    #[test]
    fn test_index_folder_is_flat() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.yaml");
        touch(temp.path(), "a.yaml");
        touch(temp.path(), "nested/c.yaml");

        let index = ConfigIndex::new();
        let names = index.index_folder(temp.path()).unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert!(!index.contains("c"));
    }

    #[test]
    fn test_index_tree_is_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.yaml");
        touch(temp.path(), "nested/c.yaml");
        touch(temp.path(), "nested/deeper/d.yaml");

        let index = ConfigIndex::new();
        index.index_tree(temp.path()).unwrap();
        assert_eq!(index.names(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_index_tree_duplicate_across_folders() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "x/same.yaml");
        touch(temp.path(), "y/same.yaml");

        let index = ConfigIndex::new();
        let err = index.index_tree(temp.path()).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateName { .. }));
        let display = err.to_string();
        assert!(display.contains("x/same.yaml") || display.contains("x\\same.yaml"));
        assert!(display.contains("y/same.yaml") || display.contains("y\\same.yaml"));
    }

    #[test]
    fn test_index_missing_folder() {
        let index = ConfigIndex::new();
        let err = index.index_folder(Path::new("/nonexistent/layerflow/conf")).unwrap_err();
        assert!(matches!(err, ResolveError::Io { .. }));
    }

    #[test]
    fn test_clear() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.yaml");
        let index = ConfigIndex::new();
        index.index_folder(temp.path()).unwrap();
        index.clear();
        assert!(index.is_empty());
    }
