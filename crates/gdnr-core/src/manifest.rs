//! Plugin manifest entries consumed by the host loader.
//!
//! The entry registrar emits, per registration group, a source fragment
//! building one [`LibraryManifest`]: the mapping from a library resource
//! path to the class names the host may instantiate from it. The host reads
//! these at load time, before any instance exists.

/// One registration group's manifest entry.
///
/// `library` is always expressed in the host's resource-path convention
/// (`res://` scheme); the registrar normalizes it at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryManifest {
    pub library: &'static str,
    pub classes: &'static [&'static str],
}

impl LibraryManifest {
    pub fn provides(&self, class: &str) -> bool {
        self.classes.contains(&class)
    }
}

impl std::fmt::Display for LibraryManifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> [{}]", self.library, self.classes.join(", "))
    }
}
