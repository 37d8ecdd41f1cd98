//! Font discovery by family name.

use std::path::{Path, PathBuf};

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];
const MAX_DEPTH: usize = 6;

/// Directories searched when a scene names a font family rather than a font file.
#[derive(Clone, Debug, Default)]
pub struct FontLibrary {
    dirs: Vec<PathBuf>,
}

impl FontLibrary {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Directories listed in `SINUS_FONT_DIRS`, then the platform's font directories.
    pub fn system() -> Self {
        let mut dirs: Vec<PathBuf> = std::env::var_os("SINUS_FONT_DIRS")
            .map(|v| std::env::split_paths(&v).collect())
            .unwrap_or_default();
        let home = std::env::var_os("HOME").map(PathBuf::from);

        if cfg!(target_os = "macos") {
            dirs.push("/System/Library/Fonts".into());
            dirs.push("/Library/Fonts".into());
            dirs.extend(home.map(|h| h.join("Library/Fonts")));
        } else if cfg!(windows) {
            if let Some(windir) = std::env::var_os("WINDIR") {
                dirs.push(PathBuf::from(windir).join("Fonts"));
            }
        } else {
            dirs.push("/usr/share/fonts".into());
            dirs.push("/usr/local/share/fonts".into());
            if let Some(home) = home {
                dirs.push(home.join(".local/share/fonts"));
                dirs.push(home.join(".fonts"));
            }
        }
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Font files whose names suggest they belong to `family`, sorted.
    ///
    /// File stems are compared with case and separators ignored, so `"DejaVu Sans Mono"` finds
    /// `DejaVuSansMono-Bold.ttf`. The family itself is confirmed from the font tables after
    /// registration.
    pub fn candidates(&self, family: &str) -> Vec<PathBuf> {
        let wanted = squash(family);
        if wanted.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for dir in &self.dirs {
            collect(dir, &wanted, 0, &mut out);
        }
        out.sort();
        out.dedup();
        out
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn collect(dir: &Path, wanted: &str, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < MAX_DEPTH {
                collect(&path, wanted, depth + 1, out);
            }
            continue;
        }
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FONT_EXTENSIONS.iter().any(|f| e.eq_ignore_ascii_case(f)));
        let matches = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| squash(s).starts_with(wanted));
        if is_font && matches {
            out.push(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/library.rs"]
mod tests;
