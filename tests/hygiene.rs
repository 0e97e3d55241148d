//! Hygiene — enforces coding standards at test time
//!
//! Scans the production sources under `src/` for patterns that would let a
//! theme failure take down page initialization or hide an error without a log
//! line. Each pattern has a budget. The budget never grows: to add one, remove
//! one first.

use std::fs;
use std::path::Path;

/// (pattern, budget, what goes wrong)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics abort the page's bootstrap script"),
    (".expect(", 0, "panics abort the page's bootstrap script"),
    ("panic!(", 0, "panics abort the page's bootstrap script"),
    ("unreachable!(", 0, "panics abort the page's bootstrap script"),
    ("todo!(", 0, "stubs must not ship"),
    ("unimplemented!(", 0, "stubs must not ship"),
    ("let _ =", 0, "discards an error without logging it"),
    (".ok()", 0, "discards an error without logging it"),
    ("#[allow(dead_code)]", 0, "dead code should be deleted"),
    // One delegated click listener and one color-scheme listener.
    (".forget()", 2, "every leaked closure is a page-lifetime listener"),
];

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`, excluding `*_test.rs`.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|file| (file.path.clone(), file.content.lines().filter(|line| line.contains(pattern)).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|file| file.path.ends_with("lib.rs")), "run from the crate root");
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for (pattern, budget, reason) in BUDGETS {
        let found = hits(&files, pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > *budget {
            let detail = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect::<Vec<_>>().join("\n");
            failures.push(format!("{pattern} budget exceeded: found {count}, max {budget} ({reason})\n{detail}"));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
