use std::fmt;

use thiserror::Error;

pub const DBFS_SCHEME: &str = "dbfs:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("{0} is not a DBFS path; it must be prefixed with dbfs:/")]
    MissingScheme(String),
    #[error("DBFS path {0} contains unsupported component")]
    UnsupportedComponent(String),
}

/// A path in DBFS, written `dbfs:/a/b` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbfsPath {
    absolute: String,
}

impl DbfsPath {
    pub fn is_valid(raw: &str) -> bool {
        raw.strip_prefix(DBFS_SCHEME)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let rest = raw
            .strip_prefix(DBFS_SCHEME)
            .filter(|rest| rest.starts_with('/'))
            .ok_or_else(|| PathError::MissingScheme(raw.to_string()))?;

        let mut parts = Vec::new();
        for part in rest.split('/') {
            match part {
                "" | "." => continue,
                ".." => return Err(PathError::UnsupportedComponent(raw.to_string())),
                part => parts.push(part),
            }
        }
        Ok(Self {
            absolute: format!("/{}", parts.join("/")),
        })
    }

    /// The path as the REST API expects it, without the scheme.
    pub fn absolute_path(&self) -> &str {
        &self.absolute
    }

    pub fn join(&self, name: &str) -> Self {
        Self {
            absolute: join_remote(&self.absolute, name),
        }
    }

    pub fn basename(&self) -> &str {
        self.absolute.rsplit('/').next().unwrap_or_default()
    }
}

impl fmt::Display for DbfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DBFS_SCHEME}{}", self.absolute)
    }
}

/// Joins a child name onto a `/`-separated remote path.
pub fn join_remote(parent: &str, name: &str) -> String {
    let name = name.trim_matches('/');
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}
