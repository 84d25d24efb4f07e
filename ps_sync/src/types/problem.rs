use chrono::{DateTime, Utc};

/// One logical coding exercise: the description file plus its per-language
/// solutions from a single repository folder.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub description: String,
    pub code_blocks: Vec<CodeBlock>,
    pub difficulty: String,
    pub site: String,
    pub problem_url: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub commit_sha: String,
    pub commit_url: String,
}

/// One solution attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    pub content: String,
}

/// Maps a solution file extension to the language tag the destination code
/// block accepts. Extensions outside the mapping are not synchronized.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    let language = match extension {
        "java" => "java",
        "py" => "python",
        "c" => "c",
        "cpp" | "cc" => "c++",
        "rs" => "rust",
        "js" => "javascript",
        "ts" => "typescript",
        "kt" => "kotlin",
        "go" => "go",
        "rb" => "ruby",
        "swift" => "swift",
        "scala" => "scala",
        "sql" => "sql",
        _ => return None,
    };
    Some(language)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn map_known_extensions() {
        assert_eq!(language_for_extension("java"), Some("java"));
        assert_eq!(language_for_extension("py"), Some("python"));
        assert_eq!(language_for_extension("cc"), Some("c++"));
    }

    #[test]
    fn unknown_extensions_are_not_mapped() {
        assert_eq!(language_for_extension("md"), None);
        assert_eq!(language_for_extension("class"), None);
        assert_eq!(language_for_extension(""), None);
    }
}
