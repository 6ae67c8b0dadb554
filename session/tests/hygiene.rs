//! Hygiene: enforces coding standards at test time
//!
//! Session reads run on every navigation and every guard check, so nothing in
//! `session/src` may crash the page. The store shares a `Mutex` between
//! clones, which makes lock poisoning the panic this crate is most exposed
//! to; storage and serde failures must surface as `SessionError` or fail
//! closed. Diagnostics go through `log`. Every budget is zero.

use std::fs;
use std::path::Path;

/// `(pattern, why it is banned)`; each must appear zero times.
const BANNED: &[(&str, &str)] = &[
    (".lock().unwrap()", "recover poisoned locks with PoisonError::into_inner"),
    (".lock().expect(", "recover poisoned locks with PoisonError::into_inner"),
    (".unwrap()", "propagate or fail closed"),
    (".expect(", "propagate or fail closed"),
    ("panic!(", "session code never aborts the page"),
    ("unreachable!(", "model the case in the type instead"),
    ("todo!(", "unfinished code"),
    ("println!(", "use the log facade"),
    ("eprintln!(", "use the log facade"),
    ("dbg!(", "leftover debugging"),
    ("let _ =", "storage errors must be logged, not discarded"),
    ("#[allow(dead_code)]", "delete unused code"),
];

/// Production `.rs` files under `src/`, skipping `*_test.rs` companions.
fn production_sources(dir: &Path, out: &mut Vec<(String, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            production_sources(&path, out);
            continue;
        }
        let name = path.to_string_lossy().into_owned();
        if !name.ends_with(".rs") || name.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push((name, content));
        }
    }
}

fn violations(pattern: &str) -> Vec<String> {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no source files found under src/");
    files
        .iter()
        .flat_map(|(name, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(move |(n, line)| format!("  {name}:{}: {}", n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn banned_patterns_are_absent() {
    let report: Vec<String> = BANNED
        .iter()
        .filter_map(|(pattern, why)| {
            let found = violations(pattern);
            (!found.is_empty()).then(|| format!("{pattern} ({why}):\n{}", found.join("\n")))
        })
        .collect();
    assert!(report.is_empty(), "hygiene violations:\n{}", report.join("\n"));
}

#[test]
fn shared_locks_recover_from_poisoning() {
    let guarded = violations(".lock()");
    let recovered = violations("PoisonError::into_inner");
    assert!(
        recovered.len() >= guarded.len(),
        "every lock() must recover with PoisonError::into_inner:\n{}",
        guarded.join("\n")
    );
}
