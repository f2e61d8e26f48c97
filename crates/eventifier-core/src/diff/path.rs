//! Parsed change addresses.
//!
//! Path-granularity changes are addressed as `root[index].field.sub`; only
//! the root's index is structural, deeper segments stay in `field`.

use thiserror::Error;

/// Why a change address could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty change path")]
    Empty,
    #[error("unterminated index in `{path}`")]
    UnterminatedIndex { path: String },
    #[error("non-numeric index `{index}` in `{path}`")]
    BadIndex { path: String, index: String },
}

/// Indexed containers whose changes are grouped per item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Achievements,
    ProjectsUsers,
}

impl Container {
    pub fn from_root(root: &str) -> Option<Self> {
        match root {
            "achievements" => Some(Container::Achievements),
            "projects_users" => Some(Container::ProjectsUsers),
            _ => None,
        }
    }
}

/// A change address split into root key, root index, remaining field and leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePath {
    raw: String,
    root: String,
    index: Option<usize>,
    field: Option<String>,
    leaf: String,
}

/// Strip every `[..]` suffix from a segment
fn bare(segment: &str) -> &str {
    segment.split('[').next().unwrap_or(segment)
}

impl ChangePath {
    /// Parse `location`, `projects_users[3].status`, `cursus_users[0].skills[1].level`.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] for an empty path, an unterminated bracket or
    /// a non-numeric root index.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let (head, field) = match raw.split_once('.') {
            Some((head, rest)) => (head, Some(rest.to_string())),
            None => (raw, None),
        };

        let (root, index) = match head.split_once('[') {
            Some((root, tail)) => {
                let close = tail.find(']').ok_or_else(|| PathError::UnterminatedIndex {
                    path: raw.to_string(),
                })?;
                let index_text = &tail[..close];
                let index = index_text.parse().map_err(|_| PathError::BadIndex {
                    path: raw.to_string(),
                    index: index_text.to_string(),
                })?;
                (root, Some(index))
            }
            None => (head, None),
        };
        if root.is_empty() {
            return Err(PathError::Empty);
        }

        let last = raw.rsplit('.').next().unwrap_or(raw);
        Ok(Self {
            raw: raw.to_string(),
            root: root.to_string(),
            index,
            field,
            leaf: bare(last).to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Everything after the root segment, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Last segment without index suffixes
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// A bare top-level field name (no index, no sub-path)
    pub fn is_top_level(&self) -> bool {
        self.index.is_none() && self.field.is_none()
    }

    /// `(container, index, item field)` for grouped containers.
    ///
    /// A change of a whole item (no sub-field) uses the full path as field.
    pub fn container_item(&self) -> Option<(Container, usize, &str)> {
        let container = Container::from_root(&self.root)?;
        let index = self.index?;
        Some((container, index, self.field.as_deref().unwrap_or(&self.raw)))
    }

    pub fn ends_with_any(&self, suffixes: &[&str]) -> bool {
        suffixes.iter().any(|s| self.raw.ends_with(s))
    }
}

impl std::fmt::Display for ChangePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_field() {
        let p = ChangePath::parse("location").unwrap();
        assert_eq!(p.root(), "location");
        assert_eq!(p.leaf(), "location");
        assert!(p.is_top_level());
        assert!(p.container_item().is_none());
    }

    #[test]
    fn test_indexed_container() {
        let p = ChangePath::parse("projects_users[3].status").unwrap();
        assert_eq!(p.root(), "projects_users");
        assert_eq!(p.index(), Some(3));
        assert_eq!(p.field(), Some("status"));
        assert_eq!(p.leaf(), "status");
        assert_eq!(p.container_item(), Some((Container::ProjectsUsers, 3, "status")));
    }

    #[test]
    fn test_nested_field_keeps_rest() {
        let p = ChangePath::parse("achievements[0].users_url.host").unwrap();
        assert_eq!(p.container_item(), Some((Container::Achievements, 0, "users_url.host")));
        assert_eq!(p.leaf(), "host");
    }

    #[test]
    fn test_whole_item_change_uses_full_path() {
        let p = ChangePath::parse("projects_users[1]").unwrap();
        assert_eq!(p.container_item(), Some((Container::ProjectsUsers, 1, "projects_users[1]")));
        assert_eq!(p.leaf(), "projects_users");
    }

    #[test]
    fn test_leaf_strips_nested_index() {
        let p = ChangePath::parse("cursus_users[0].skills[2]").unwrap();
        assert_eq!(p.leaf(), "skills");
        assert_eq!(p.container_item(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ChangePath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            ChangePath::parse("projects_users[x].status"),
            Err(PathError::BadIndex { .. })
        ));
        assert!(matches!(
            ChangePath::parse("projects_users[3.status"),
            Err(PathError::UnterminatedIndex { .. })
        ));
        assert_eq!(ChangePath::parse("[1].a"), Err(PathError::Empty));
    }

    #[test]
    fn test_suffix_match() {
        let p = ChangePath::parse("projects_users[0].marked_at").unwrap();
        assert!(p.ends_with_any(&["updated_at", "marked_at"]));
        assert!(!p.ends_with_any(&["created_at"]));
    }
}
