//! File system walking

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Walk a directory and return the paths of all regular files, relative to
/// `root`. Ignore files (`.gitignore` and friends) are honored.
pub fn scan_directory(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .ignore(true)
        .parents(true)
        .build();

    for entry in walker.flatten() {
        let path = entry.path();

        if path.components().any(|c| c.as_os_str() == ".git") {
            continue;
        }

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        if let Ok(relative) = path.strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("Main.java"), "class Main {}").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/Util.kt"), "object Util").unwrap();

        let files = scan_directory(root);

        assert!(files.contains(&PathBuf::from("Main.java")));
        assert!(files.contains(&Path::new("subdir").join("Util.kt")));
        assert!(!files.contains(&PathBuf::from("subdir")));
    }
}
