use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::logger::Logger;

/// Directory names that never carry user data; pruned during the walk.
const SYSTEM_DIR_DENYLIST: &[&str] = &[
    "$RECYCLE.BIN",
    "System Volume Information",
    "lost+found",
    ".Trashes",
    ".fseventsd",
    ".Spotlight-V100",
];

/// A regular file discovered under the source root. Produced once by the
/// scan and dropped after its transfer task completes.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

fn is_system_dir(name: &str) -> bool {
    SYSTEM_DIR_DENYLIST
        .iter()
        .any(|deny| name.eq_ignore_ascii_case(deny))
}

/// Walk `root` and collect every regular file with its size, in traversal
/// order. Entries that fail to stat are logged and omitted; the scan never
/// aborts on a per-entry error. The caller is responsible for checking
/// that `root` exists and is a directory.
pub fn enumerate_source(root: &Path, logger: &dyn Logger) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        !(entry.depth() > 0
            && entry.file_type().is_dir()
            && entry.file_name().to_str().is_some_and(is_system_dir))
    });

    for next in walker {
        let entry = match next {
            Ok(entry) => entry,
            Err(err) => {
                logger.warn(&format!("scan: {err}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => entries.push(FileEntry {
                path: entry.path().to_path_buf(),
                size: meta.len(),
            }),
            Err(err) => logger.error("stat", entry.path(), &err.to_string()),
        }
    }
    log::debug!("enumerated {} files under {}", entries.len(), root.display());
    entries
}
