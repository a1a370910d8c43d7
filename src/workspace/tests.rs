//! Tests for workspace module.

#[cfg(test)]
mod tests {
    use crate::config::ConfigKey;
    use crate::error::Error;
    use crate::workspace::scanner::MAX_FILE_SIZE;
    use crate::workspace::{Workspace, DEFAULT_BRANCH, MARKER_DIR};
    use crate::workspace::scanner::snapshot;
    use std::fs::{self, File};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Run `f` with warnings routed into a buffer instead of stderr.
    fn with_captured_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    fn init_workspace() -> (TempDir, Workspace) {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::init(temp_dir.path()).unwrap();
        (temp_dir, workspace)
    }

    #[test]
    fn test_init_creates_marker_history_and_head() {
        let (temp_dir, workspace) = init_workspace();

        assert!(temp_dir.path().join(MARKER_DIR).is_dir());
        assert!(workspace.history().load().unwrap().is_empty());
        assert!(workspace.history().path().exists());
        assert_eq!(workspace.head().get().unwrap(), DEFAULT_BRANCH);
    }

    #[test]
    fn test_init_twice_fails() {
        let (temp_dir, _workspace) = init_workspace();

        let err = Workspace::init(temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized(_)));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (temp_dir, _workspace) = init_workspace();
        let nested = temp_dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&nested).unwrap();

        let found = Workspace::discover(&nested).unwrap();
        assert_eq!(found.root(), temp_dir.path());
    }

    #[test]
    fn test_init_then_config_set_get() {
        let (temp_dir, _workspace) = init_workspace();

        let workspace = Workspace::discover(temp_dir.path()).unwrap();
        workspace
            .config()
            .set(ConfigKey::ApiUrl, "https://x")
            .unwrap();

        let workspace = Workspace::discover(temp_dir.path()).unwrap();
        assert_eq!(workspace.config().get(ConfigKey::ApiUrl).unwrap(), "https://x");
    }

    #[test]
    fn test_snapshot_collects_nested_text_files() {
        let (temp_dir, workspace) = init_workspace();

        let mut f = File::create(temp_dir.path().join("file1.txt")).unwrap();
        writeln!(f, "Hello").unwrap();
        fs::create_dir_all(temp_dir.path().join("src").join("bin")).unwrap();
        fs::write(temp_dir.path().join("src").join("bin").join("tool.rs"), "fn main() {}").unwrap();

        let files = workspace.snapshot().unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files.get("file1.txt").map(String::as_str), Some("Hello\n"));
        assert_eq!(
            files.get("src/bin/tool.rs").map(String::as_str),
            Some("fn main() {}")
        );
    }

    #[test]
    fn test_snapshot_excludes_markers_and_hidden_entries() {
        let (temp_dir, workspace) = init_workspace();
        let root = temp_dir.path();

        fs::write(root.join("keep.txt"), "keep").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();

        fs::create_dir_all(root.join(".git").join("objects")).unwrap();
        fs::write(root.join(".git").join("config"), "[core]").unwrap();
        fs::write(root.join(".git").join("objects").join("ab"), "blob").unwrap();

        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join(".cache").join("data.txt"), "cached").unwrap();

        fs::create_dir_all(root.join("nested").join(".git")).unwrap();
        fs::write(root.join("nested").join(".git").join("HEAD"), "ref").unwrap();
        fs::write(root.join("nested").join(".hidden"), "hidden").unwrap();
        fs::write(root.join("nested").join("visible.txt"), "visible").unwrap();

        let files = workspace.snapshot().unwrap();
        let keys: Vec<&str> = files.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["keep.txt", "nested/visible.txt"]);
        assert!(!keys.iter().any(|k| k.starts_with(MARKER_DIR)));
    }

    #[test]
    fn test_snapshot_skips_large_files() {
        let (temp_dir, workspace) = init_workspace();

        let big = vec![b'x'; MAX_FILE_SIZE as usize + 1];
        fs::write(temp_dir.path().join("big.txt"), &big).unwrap();
        let exact = vec![b'y'; MAX_FILE_SIZE as usize];
        fs::write(temp_dir.path().join("exact.txt"), &exact).unwrap();

        let (files, logs) = with_captured_warnings(|| workspace.snapshot().unwrap());

        assert!(logs.contains("WARN"));
        assert!(logs.contains("Skipping large file"));
        assert!(logs.contains("big.txt"));
        assert!(!logs.contains("exact.txt"));
        assert!(!files.contains_key("big.txt"));
        assert_eq!(files.get("exact.txt").map(String::len), Some(MAX_FILE_SIZE as usize));
    }

    #[test]
    fn test_snapshot_skips_binary_files() {
        let (temp_dir, workspace) = init_workspace();

        fs::write(temp_dir.path().join("image.png"), b"\x89PNG\r\n\x1a\n\0\0\0").unwrap();
        let mut late_nul = vec![b'a'; 600];
        late_nul[550] = 0;
        fs::write(temp_dir.path().join("late.txt"), &late_nul).unwrap();

        let (files, logs) = with_captured_warnings(|| workspace.snapshot().unwrap());

        assert!(logs.contains("Skipping binary file"));
        assert!(logs.contains("image.png"));
        assert!(!logs.contains("late.txt"));
        assert!(!files.contains_key("image.png"));
        assert!(files.contains_key("late.txt"));
    }

    #[test]
    fn test_snapshot_of_missing_root_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        assert!(matches!(snapshot(&missing), Err(Error::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_snapshot_unreadable_file_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let (temp_dir, workspace) = init_workspace();
        fs::write(temp_dir.path().join("ok.txt"), "fine").unwrap();
        let locked = temp_dir.path().join("locked.txt");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the mode bits; nothing to check then.
        if fs::read(&locked).is_ok() {
            return;
        }

        match workspace.snapshot() {
            Err(Error::Io { path, .. }) => assert_eq!(path, locked),
            other => panic!("expected read failure, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_is_stable() {
        let (temp_dir, workspace) = init_workspace();
        for name in ["b.txt", "a.txt", "c.txt"] {
            fs::write(temp_dir.path().join(name), name).unwrap();
        }

        assert_eq!(workspace.snapshot().unwrap(), workspace.snapshot().unwrap());
    }

    #[test]
    fn test_write_file_creates_parents() {
        let (temp_dir, workspace) = init_workspace();

        workspace.write_file("docs/guide/intro.md", "# Intro").unwrap();

        let written = fs::read_to_string(temp_dir.path().join("docs/guide/intro.md")).unwrap();
        assert_eq!(written, "# Intro");
    }

    #[test]
    fn test_write_file_rejects_escaping_paths() {
        let (_temp_dir, workspace) = init_workspace();

        for path in ["../outside.txt", "/etc/passwd", "a/../../b", ".gitr/HEAD", ""] {
            let err = workspace.write_file(path, "x").unwrap_err();
            assert!(matches!(err, Error::UnsafePath(_)), "accepted {:?}", path);
        }
    }
}
