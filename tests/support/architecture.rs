//! Source scanning for the layer rules in `architecture_contract_tests`.

use std::fs;
use std::path::{Path, PathBuf};

/// A line of source that broke a layer rule: file, 1-based line, text.
pub type Hit = (String, usize, String);

fn crate_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()));
    for path in entries.map(|entry| entry.expect("directory entry").path()) {
        if path.is_dir() {
            walk(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

/// Every `.rs` file under `dir` as `(path relative to the crate, contents)`.
fn sources(dir: &str) -> Vec<(String, String)> {
    let mut paths = Vec::new();
    walk(&crate_root().join(dir), &mut paths);
    paths.sort();
    paths
        .into_iter()
        .map(|path| {
            let name = path
                .strip_prefix(crate_root())
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let text = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("cannot read {name}: {e}"));
            (name, text)
        })
        .collect()
}

/// Contents of one file, relative to the crate root.
pub fn read_relative(file: &str) -> String {
    fs::read_to_string(crate_root().join(file))
        .unwrap_or_else(|e| panic!("cannot read {file}: {e}"))
}

/// Lines under `dir` containing any of `needles`.
pub fn find_lines_containing(dir: &str, needles: &[&str]) -> Vec<Hit> {
    sources(dir)
        .into_iter()
        .flat_map(|(name, text)| {
            text.lines()
                .enumerate()
                .filter(|(_, line)| needles.iter().any(|n| line.contains(n)))
                .map(|(i, line)| (name.clone(), i + 1, line.to_string()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Lines of `mod.rs` files under `dir` that do more than declare or re-export
/// modules. Multi-line `pub use` lists are allowed.
pub fn find_non_export_lines_in_mod_files(dir: &str) -> Vec<Hit> {
    let mut hits = Vec::new();
    for (name, text) in sources(dir) {
        if !name.ends_with("/mod.rs") {
            continue;
        }
        let mut open_use = false;
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let starts_use = line.starts_with("pub use ") || line.starts_with("pub(crate) use ");
            if open_use || starts_use {
                open_use = !line.ends_with(';');
                continue;
            }
            let allowed = line.is_empty()
                || line.starts_with("//")
                || line.starts_with("#[cfg")
                || line.starts_with("mod ")
                || line.starts_with("pub mod ");
            if !allowed {
                hits.push((name.clone(), i + 1, raw.to_string()));
            }
        }
    }
    hits
}
