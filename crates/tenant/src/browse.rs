//! `browse(path, depth)`: a bounded-depth directory listing for filesystem/git
//! tenants (spec.md §4.5). Skips the index/scheduler bookkeeping directories
//! the same way the indexer's source walk does.

use std::path::Path;

use crate::error::TenantError;
use crate::types::DirectoryEntry;

const RESERVED_DIRS: &[&str] = &["__search_segments", "__scheduler_meta"];

pub fn browse(root: &Path, relative_path: &Path, max_depth: u32) -> Result<DirectoryEntry, TenantError> {
    let start = root.join(relative_path);
    build_entry(&start, max_depth)
}

fn build_entry(path: &Path, depth_remaining: u32) -> Result<DirectoryEntry, TenantError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let metadata = std::fs::metadata(path).map_err(|e| TenantError::io(path, e))?;
    if !metadata.is_dir() {
        return Ok(DirectoryEntry {
            name,
            is_dir: false,
            children: Vec::new(),
        });
    }

    let mut children = Vec::new();
    if depth_remaining > 0 {
        let mut entries: Vec<_> = std::fs::read_dir(path)
            .map_err(|e| TenantError::io(path, e))?
            .filter_map(|e| e.ok())
            .collect();
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let entry_name = entry.file_name();
            let entry_name = entry_name.to_string_lossy();
            if RESERVED_DIRS.contains(&entry_name.as_ref()) {
                continue;
            }
            children.push(build_entry(&entry.path(), depth_remaining - 1)?);
        }
    }

    Ok(DirectoryEntry {
        name,
        is_dir: true,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_directory_tree_and_skips_reserved_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::create_dir_all(dir.path().join("guide")).unwrap();
        std::fs::write(dir.path().join("guide/b.md"), "b").unwrap();
        std::fs::create_dir_all(dir.path().join("__search_segments")).unwrap();

        let tree = browse(dir.path(), Path::new(""), 5).unwrap();
        assert!(tree.is_dir);
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"a.md"));
        assert!(names.contains(&"guide"));
        assert!(!names.contains(&"__search_segments"));
    }

    #[test]
    fn depth_limit_stops_descending() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b/c")).unwrap();

        let tree = browse(dir.path(), Path::new(""), 1).unwrap();
        let a = tree.children.iter().find(|c| c.name == "a").unwrap();
        assert!(a.children.is_empty());
    }
}
