//! Paths as the editor sees them on the user's machine.
//!
//! The draft is built on the server but its documents must reference the
//! location the user will copy it to, which may be a Windows path. Joining uses
//! the separator style of the destination root rather than the host's.

/// Destination root on the user's machine (the editor's draft folder).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPath(String);

impl UserPath {
    /// Wrap a caller-supplied root.
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Raw path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Separator used by this path: `\` for Windows-style roots, `/` otherwise.
    pub fn separator(&self) -> char {
        if self.0.contains('\\') && !self.0.contains('/') {
            '\\'
        } else {
            '/'
        }
    }

    /// Whether the root looks like a POSIX absolute path.
    pub fn is_posix(&self) -> bool {
        self.0.starts_with('/')
    }

    /// Append one component using this path's separator.
    pub fn join(&self, component: &str) -> Self {
        let sep = self.separator();
        if self.0.is_empty() {
            return Self(component.to_string());
        }
        let base = self.0.trim_end_matches(sep);
        Self(format!("{base}{sep}{component}"))
    }
}

impl std::fmt::Display for UserPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relative path recorded in meta assets for a file in the material folder.
pub fn material_rel_path(file_name: &str) -> String {
    format!("./material/{file_name}")
}

/// Remove all whitespace from a caller-supplied display name.
pub fn compact_name(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/paths.rs"]
mod tests;
