use std::path::Path;

/// Language family a file is chunked as, derived from its extension.
///
/// The set is deliberately coarse: boundary detection only needs to know
/// which scanner applies, not the precise dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    /// Brace-structured, annotation-carrying languages (`.java`).
    Java,
    /// Brace-structured with `function` declarations (`.php`).
    Php,
    /// Tag-structured markup (`.xml`, `.pom`, any `pom.xml`).
    Markup,
    /// Everything else; chunked as fixed-size windows.
    Other,
}

impl LanguageTag {
    /// Detect the tag from a file path. `pom.xml` is recognized by name even
    /// when the extension alone would not resolve.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if file_name.eq_ignore_ascii_case("pom.xml") {
            return Self::Markup;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Other)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "java" => Self::Java,
            "php" => Self::Php,
            "xml" | "pom" => Self::Markup,
            _ => Self::Other,
        }
    }

    /// Resolve a tag string back into a tag; unknown strings map to
    /// [`LanguageTag::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "java" => Self::Java,
            "php" => Self::Php,
            "markup" | "xml" => Self::Markup,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Php => "php",
            Self::Markup => "markup",
            Self::Other => "other",
        }
    }

    /// Minimum substantive chunk size for the merge post-pass. Chunks below
    /// this (and not declaration-bearing) are folded into a neighbor.
    #[must_use]
    pub const fn min_merge_lines(self) -> usize {
        match self {
            Self::Java => 20,
            Self::Php => 50,
            Self::Markup => 3,
            Self::Other => 0,
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
