//! Project references.
//!
//! GitLab accepts either a project's numeric ID or its namespaced path
//! (`group/subgroup/project`) wherever a project is addressed. [`ProjectId`]
//! holds one or the other and renders it as a single escaped path segment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{GitLabError, Result};

/// A project addressed by numeric ID or by namespaced path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ProjectId {
    /// Numeric project ID.
    Numeric(u64),
    /// Namespaced path, e.g. `group/project`.
    Path(String),
}

impl ProjectId {
    /// Render as a URL path segment.
    ///
    /// Paths are percent-escaped so `/` becomes `%2F`. Dots are escaped too,
    /// otherwise GitLab reads a trailing `.json`-like suffix as a format.
    pub fn path_segment(&self) -> String {
        match self {
            Self::Numeric(id) => id.to_string(),
            Self::Path(path) => urlencoding::encode(path).replace('.', "%2E"),
        }
    }

    /// Check that the reference can address a project.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for ID zero and for an empty or blank path.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Numeric(0) => Err(GitLabError::InvalidArgument(
                "project id must be a positive integer, got 0".to_string(),
            )),
            Self::Path(path) if path.trim().is_empty() => Err(GitLabError::InvalidArgument(
                "project path must not be empty".to_string(),
            )),
            Self::Path(path) if path.trim().parse::<u64>() == Ok(0) => Err(
                GitLabError::InvalidArgument("project id must be a positive integer, got 0".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for ProjectId {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&ProjectId> for ProjectId {
    fn from(id: &ProjectId) -> Self {
        id.clone()
    }
}

impl FromStr for ProjectId {
    type Err = GitLabError;

    /// Digit-only input is a numeric ID; anything else non-empty is a path.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GitLabError::InvalidArgument(
                "project reference must not be empty".to_string(),
            ));
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = s.parse::<u64>() {
                let id = Self::Numeric(id);
                id.validate()?;
                return Ok(id);
            }
        }
        Ok(Self::Path(s.to_string()))
    }
}

impl TryFrom<&Value> for ProjectId {
    type Error = GitLabError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(id) if id > 0 => Ok(Self::Numeric(id)),
                _ => Err(GitLabError::InvalidArgument(format!(
                    "project id must be a positive integer, got {n}"
                ))),
            },
            Value::String(s) if !s.trim().is_empty() => Ok(Self::Path(s.clone())),
            Value::String(_) => Err(GitLabError::InvalidArgument(
                "project path must not be empty".to_string(),
            )),
            other => Err(GitLabError::InvalidArgument(format!(
                "project id must be an integer or a string, got {}",
                json_type_name(other)
            ))),
        }
    }
}

impl TryFrom<Value> for ProjectId {
    type Error = GitLabError;

    fn try_from(value: Value) -> Result<Self> {
        Self::try_from(&value)
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_segment() {
        assert_eq!(ProjectId::Numeric(42).path_segment(), "42");
    }

    #[test]
    fn test_path_segment_escapes_separators() {
        let id = ProjectId::from("my-group/sub group/my.project");
        assert_eq!(id.path_segment(), "my-group%2Fsub%20group%2Fmy%2Eproject");
    }

    #[test]
    fn test_string_of_digits_stays_a_single_segment() {
        assert_eq!(ProjectId::from("42").path_segment(), "42");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("123".parse::<ProjectId>().unwrap(), ProjectId::Numeric(123));
        assert_eq!(
            "group/project".parse::<ProjectId>().unwrap(),
            ProjectId::Path("group/project".to_string())
        );
        assert!("".parse::<ProjectId>().is_err());
        assert!("   ".parse::<ProjectId>().is_err());
        assert!("0".parse::<ProjectId>().is_err());
        assert!("000".parse::<ProjectId>().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_and_blank_paths() {
        assert!(ProjectId::Numeric(1).validate().is_ok());
        assert!(ProjectId::from("g/p").validate().is_ok());

        for id in [
            ProjectId::Numeric(0),
            ProjectId::from(""),
            ProjectId::from("  "),
            ProjectId::from("0"),
        ] {
            let err = id.validate().unwrap_err();
            assert!(matches!(err, GitLabError::InvalidArgument(_)), "{id:?}: {err:?}");
        }
    }

    #[test]
    fn test_try_from_json_accepts_integers_and_strings() {
        assert_eq!(ProjectId::try_from(&json!(7)).unwrap(), ProjectId::Numeric(7));
        assert_eq!(
            ProjectId::try_from(json!("group/project")).unwrap(),
            ProjectId::Path("group/project".to_string())
        );
    }

    #[test]
    fn test_try_from_json_rejects_other_types() {
        for value in [
            json!(null),
            json!(true),
            json!(1.5),
            json!(-3),
            json!(0),
            json!(""),
            json!(" "),
            json!([1, 2]),
            json!({"id": 1}),
        ] {
            let err = ProjectId::try_from(&value).unwrap_err();
            assert!(
                matches!(err, GitLabError::InvalidArgument(_)),
                "expected InvalidArgument for {value}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let id: ProjectId = serde_json::from_str("15").unwrap();
        assert_eq!(id, ProjectId::Numeric(15));

        let id: ProjectId = serde_json::from_str("\"a/b\"").unwrap();
        assert_eq!(id, ProjectId::Path("a/b".to_string()));

        assert!(serde_json::from_str::<ProjectId>("false").is_err());
    }

    #[test]
    fn test_serialize_untagged() {
        assert_eq!(serde_json::to_value(ProjectId::Numeric(3)).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(ProjectId::from("a/b")).unwrap(),
            json!("a/b")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ProjectId::Numeric(9).to_string(), "9");
        assert_eq!(ProjectId::from("g/p").to_string(), "g/p");
    }
}
