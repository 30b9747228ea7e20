//! Input file discovery

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use remodel_engine::{EngineConfig, FileReport};

/// Files to process plus the paths that could not be examined
#[derive(Debug, Default)]
pub(crate) struct Inputs {
    /// Sorted, deduplicated source files
    pub(crate) paths: Vec<PathBuf>,
    /// Roots and entries that could not be read
    pub(crate) failures: Vec<FileReport>,
}

impl Inputs {
    fn fail(&mut self, path: &Path, error: &io::Error) {
        tracing::warn!(path = %path.display(), error = %error, "cannot read path");
        self.failures.push(FileReport::io_failure(path, error));
    }
}

/// Expand roots into source files
///
/// Files named directly are always taken; directories are walked for files
/// with a configured extension, skipping configured directory names. A root
/// or entry that cannot be read is recorded and the walk goes on.
pub(crate) fn collect_paths(roots: &[PathBuf], config: &EngineConfig) -> Inputs {
    let mut inputs = Inputs::default();
    for root in roots {
        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => walk(root, config, &mut inputs),
            Ok(meta) if meta.is_file() => inputs.paths.push(root.clone()),
            Ok(_) => {
                let error = io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "neither a file nor a directory",
                );
                inputs.fail(root, &error);
            }
            Err(e) => inputs.fail(root, &e),
        }
    }
    inputs.paths.sort();
    inputs.paths.dedup();
    inputs
}

fn walk(dir: &Path, config: &EngineConfig, inputs: &mut Inputs) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return inputs.fail(dir, &e),
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                inputs.fail(dir, &e);
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                inputs.fail(&path, &e);
                continue;
            }
        };
        if file_type.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| config.skips(n));
            if skipped {
                tracing::debug!(dir = %path.display(), "skipping directory");
                continue;
            }
            walk(&path, config, inputs);
        } else if file_type.is_file() && config.accepts(&path) {
            inputs.paths.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "").expect("write");
    }

    fn relative(found: &[PathBuf], root: &Path) -> Vec<String> {
        found
            .iter()
            .map(|p| p.strip_prefix(root).expect("prefix").to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn walks_sources_and_skips_vendor_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for name in [
            "pages/index.js",
            "pages/_app.tsx",
            "components/Button.jsx",
            "components/README.md",
            "node_modules/react/index.js",
            ".next/server/page.js",
        ] {
            touch(&root.join(name));
        }

        let inputs = collect_paths(&[root.to_path_buf()], &EngineConfig::default());
        assert!(inputs.failures.is_empty());
        assert_eq!(
            relative(&inputs.paths, root),
            vec!["components/Button.jsx", "pages/_app.tsx", "pages/index.js"]
        );
    }

    #[test]
    fn named_files_bypass_extension_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("component.es6");
        touch(&file);
        let inputs = collect_paths(&[file.clone(), file.clone()], &EngineConfig::default());
        assert_eq!(inputs.paths, vec![file]);
    }

    #[test]
    fn missing_root_is_reported_and_others_still_walked() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("src/a.js"));
        let missing = dir.path().join("nope");
        let inputs = collect_paths(
            &[missing.clone(), dir.path().join("src")],
            &EngineConfig::default(),
        );
        assert_eq!(relative(&inputs.paths, dir.path()), vec!["src/a.js"]);
        assert_eq!(inputs.failures.len(), 1);
        assert_eq!(inputs.failures[0].path, missing);
        assert_eq!(inputs.failures[0].error_kind, Some("io"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_stop_the_walk() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        touch(&root.join("locked/hidden.js"));
        touch(&root.join("open/shown.js"));
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read_dir(&locked).is_ok() {
            // privileged user, permissions are not enforced
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
            return;
        }

        let inputs = collect_paths(&[root.to_path_buf()], &EngineConfig::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
        assert_eq!(relative(&inputs.paths, root), vec!["open/shown.js"]);
        assert_eq!(inputs.failures.len(), 1);
        assert_eq!(inputs.failures[0].path, locked);
    }
}
