use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkspaceLanguage {
    Scala,
    Python,
    Sql,
    R,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkspaceFormat {
    #[default]
    Source,
    Html,
    Jupyter,
    Dbc,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} {value:?}, expected one of {expected}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl WorkspaceLanguage {
    pub const ALL: [WorkspaceLanguage; 4] = [
        WorkspaceLanguage::Scala,
        WorkspaceLanguage::Python,
        WorkspaceLanguage::Sql,
        WorkspaceLanguage::R,
    ];

    /// File extension used for notebooks of this language, dot included.
    pub fn extension(self) -> &'static str {
        match self {
            WorkspaceLanguage::Scala => ".scala",
            WorkspaceLanguage::Python => ".py",
            WorkspaceLanguage::Sql => ".sql",
            WorkspaceLanguage::R => ".r",
        }
    }

    /// Inverse of [`WorkspaceLanguage::extension`]. The leading dot is optional and
    /// the comparison ignores ASCII case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        Self::ALL
            .into_iter()
            .find(|language| language.extension()[1..].eq_ignore_ascii_case(extension))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceLanguage::Scala => "SCALA",
            WorkspaceLanguage::Python => "PYTHON",
            WorkspaceLanguage::Sql => "SQL",
            WorkspaceLanguage::R => "R",
        }
    }

    pub fn supported_extensions() -> String {
        Self::ALL
            .iter()
            .map(|language| language.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl WorkspaceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceFormat::Source => "SOURCE",
            WorkspaceFormat::Html => "HTML",
            WorkspaceFormat::Jupyter => "JUPYTER",
            WorkspaceFormat::Dbc => "DBC",
        }
    }
}

impl fmt::Display for WorkspaceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WorkspaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkspaceLanguage {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| ParseEnumError {
                kind: "language",
                value: value.to_string(),
                expected: "SCALA, PYTHON, SQL, R",
            })
    }
}

impl FromStr for WorkspaceFormat {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [
            WorkspaceFormat::Source,
            WorkspaceFormat::Html,
            WorkspaceFormat::Jupyter,
            WorkspaceFormat::Dbc,
        ]
        .into_iter()
        .find(|format| format.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| ParseEnumError {
            kind: "format",
            value: value.to_string(),
            expected: "SOURCE, HTML, JUPYTER, DBC",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping_is_a_bijection() {
        for language in WorkspaceLanguage::ALL {
            assert_eq!(
                WorkspaceLanguage::from_extension(language.extension()),
                Some(language)
            );
        }
        let mut extensions: Vec<_> = WorkspaceLanguage::ALL
            .iter()
            .map(|language| language.extension())
            .collect();
        extensions.sort_unstable();
        extensions.dedup();
        assert_eq!(extensions.len(), WorkspaceLanguage::ALL.len());
    }

    #[test]
    fn infers_language_from_path() {
        assert_eq!(
            WorkspaceLanguage::from_path(Path::new("/tmp/a/b.scala")),
            Some(WorkspaceLanguage::Scala)
        );
        assert_eq!(
            WorkspaceLanguage::from_path(Path::new("c.py")),
            Some(WorkspaceLanguage::Python)
        );
        assert_eq!(
            WorkspaceLanguage::from_path(Path::new("d.R")),
            Some(WorkspaceLanguage::R)
        );
        assert_eq!(
            WorkspaceLanguage::from_path(Path::new("e.sql")),
            Some(WorkspaceLanguage::Sql)
        );
    }

    #[test]
    fn unsupported_extensions_have_no_language() {
        assert_eq!(WorkspaceLanguage::from_path(Path::new("notes.txt")), None);
        assert_eq!(WorkspaceLanguage::from_path(Path::new("Makefile")), None);
        assert_eq!(WorkspaceLanguage::from_extension(""), None);
    }

    #[test]
    fn parses_cli_values_case_insensitively() {
        assert_eq!(
            "python".parse::<WorkspaceLanguage>(),
            Ok(WorkspaceLanguage::Python)
        );
        assert_eq!(
            "Jupyter".parse::<WorkspaceFormat>(),
            Ok(WorkspaceFormat::Jupyter)
        );
        let err = "cobol".parse::<WorkspaceLanguage>().unwrap_err();
        assert!(err.to_string().contains("SCALA, PYTHON, SQL, R"));
    }
}
