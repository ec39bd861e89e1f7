//! Diff assembly: filter changed files and concatenate their patches.
//!
//! The output is one text document, each file's patch preceded by a
//! `=== path ===` boundary marker so the prompt (and the model's line
//! numbering) can recover per-file context.

use tracing::debug;

use crate::github::PrFile;

/// Per-file ceiling: files with more changed lines than this are dropped.
pub const MAX_FILE_CHANGES: u64 = 500;

/// Extensions that never carry reviewable text patches.
const BINARY_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".ico", ".svg", ".pdf", ".zip", ".tar", ".gz", ".bz2", ".xz",
    ".exe", ".dll", ".so", ".dylib", ".woff", ".woff2", ".ttf", ".eot", ".mp3", ".mp4", ".avi",
    ".mov", ".class", ".jar", ".war",
];

/// Heuristic: binary-ish file, judged by extension (case-insensitive).
pub fn is_binary_path(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    BINARY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Builds the diff document from the listed files, in listing order.
///
/// A file is skipped when it has no textual patch (binary or rename-only),
/// when its changed-line count exceeds [`MAX_FILE_CHANGES`], or when its
/// extension is on the binary denylist.
pub fn build_diff_document(files: &[PrFile]) -> String {
    let mut out = String::new();
    for file in files {
        let Some(patch) = &file.patch else {
            debug!(file = %file.filename, "skipping file without patch");
            continue;
        };
        if file.changes > MAX_FILE_CHANGES {
            debug!(
                file = %file.filename,
                changes = file.changes,
                "skipping oversized file"
            );
            continue;
        }
        if is_binary_path(&file.filename) {
            debug!(file = %file.filename, "skipping binary file");
            continue;
        }

        out.push_str(&format!("=== {} ===\n", file.filename));
        out.push_str(patch);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, changes: u64, patch: Option<&str>) -> PrFile {
        PrFile {
            filename: name.to_string(),
            changes,
            patch: patch.map(|p| p.to_string()),
        }
    }

    #[test]
    fn concatenates_with_boundary_markers() {
        let files = vec![
            file("src/app.rs", 4, Some("@@ -1,2 +1,3 @@\n+fn main() {}")),
            file("README.md", 1, Some("@@ -0,0 +1 @@\n+# hi")),
        ];
        let diff = build_diff_document(&files);
        assert!(diff.starts_with("=== src/app.rs ===\n"));
        assert!(diff.contains("=== README.md ===\n"));
        // Listing order is preserved.
        assert!(diff.find("src/app.rs").unwrap() < diff.find("README.md").unwrap());
    }

    #[test]
    fn png_is_never_included_even_with_patch() {
        let files = vec![file("logo.png", 2, Some("@@ fake patch @@"))];
        assert!(build_diff_document(&files).is_empty());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_binary_path("ASSETS/Logo.PNG"));
        assert!(is_binary_path("lib/native.So"));
        assert!(!is_binary_path("src/main.rs"));
        assert!(!is_binary_path("notes/pngs.md"));
    }

    #[test]
    fn missing_patch_or_oversized_file_is_skipped() {
        let files = vec![
            file("renamed.rs", 0, None),
            file("generated.rs", MAX_FILE_CHANGES + 1, Some("+huge")),
            file("kept.rs", MAX_FILE_CHANGES, Some("+ok")),
        ];
        let diff = build_diff_document(&files);
        assert!(!diff.contains("renamed.rs"));
        assert!(!diff.contains("generated.rs"));
        assert!(diff.contains("=== kept.rs ===\n"));
    }
}
