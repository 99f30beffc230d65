//! Todo entity definitions.

use serde::{Deserialize, Serialize};

/// Title of the example record seeded into an empty store.
pub const EXAMPLE_TODO_TITLE: &str = "Something to do...";

/// A single task record.
///
/// Every field except `id` is optional. A field that is missing from an
/// incoming payload and a field set to `null` are treated the same way: the
/// field is absent. Absent fields are omitted when encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier. `0` means "not assigned yet".
    #[serde(default)]
    pub id: i32,
    /// Title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether the task is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Client-side sort hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Canonical address of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Todo {
    /// Creates a todo with every field present.
    pub fn new(
        id: i32,
        title: impl Into<String>,
        completed: bool,
        order: i32,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: Some(title.into()),
            completed: Some(completed),
            order: Some(order),
            url: Some(url.into()),
        }
    }

    /// The record seeded into an empty store.
    pub fn example(id: i32) -> Self {
        Self::new(id, EXAMPLE_TODO_TITLE, false, 1, "todo/ex")
    }

    /// Combines `self` with an incoming partial todo.
    ///
    /// Each field takes the value from `new` when present there and keeps the
    /// value from `self` otherwise. The id is always kept from `self`.
    pub fn merge(&self, new: &Todo) -> Todo {
        Todo {
            id: self.id,
            title: new.title.clone().or_else(|| self.title.clone()),
            completed: new.completed.or(self.completed),
            order: new.order.or(self.order),
            url: new.url.clone().or_else(|| self.url.clone()),
        }
    }

    /// Returns whether the task is done, treating an absent flag as `false`.
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    /// Encodes the todo as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a todo from JSON.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Todo {
        Todo::new(7, "x", false, 3, "http://localhost/todos/7")
    }

    #[test]
    fn test_merge_takes_present_fields() {
        let patch = Todo {
            title: Some("y".to_string()),
            order: Some(9),
            ..Default::default()
        };

        let merged = stored().merge(&patch);

        assert_eq!(merged.title.as_deref(), Some("y"));
        assert_eq!(merged.order, Some(9));
        assert_eq!(merged.completed, Some(false));
        assert_eq!(merged.url.as_deref(), Some("http://localhost/todos/7"));
    }

    #[test]
    fn test_merge_with_empty_patch_is_identity() {
        let old = stored();
        assert_eq!(old.merge(&Todo::default()), old);
    }

    #[test]
    fn test_merge_never_changes_id() {
        let patch = Todo {
            id: 99,
            completed: Some(true),
            ..Default::default()
        };

        let merged = stored().merge(&patch);

        assert_eq!(merged.id, 7);
        assert_eq!(merged.completed, Some(true));
    }

    #[test]
    fn test_merge_fills_fields_absent_on_old() {
        let old = Todo {
            id: 1,
            ..Default::default()
        };
        let patch = Todo::new(0, "t", true, 2, "u");

        let merged = old.merge(&patch);

        assert_eq!(merged, Todo::new(1, "t", true, 2, "u"));
    }

    #[test]
    fn test_decode_treats_null_as_absent() {
        let todo = Todo::from_json(r#"{"title":null,"completed":true}"#).unwrap();

        assert_eq!(todo.id, 0);
        assert_eq!(todo.title, None);
        assert_eq!(todo.completed, Some(true));
        assert_eq!(todo.order, None);
    }

    #[test]
    fn test_encode_uses_lower_case_names_and_skips_absent() {
        let todo = Todo {
            id: 3,
            title: Some("buy milk".to_string()),
            ..Default::default()
        };

        let json: serde_json::Value = serde_json::from_str(&todo.to_json().unwrap()).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["title"], "buy milk");
        assert!(json.get("completed").is_none());
        assert!(json.get("url").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let todo = stored();
        let back = Todo::from_json(&todo.to_json().unwrap()).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        assert!(Todo::from_json(r#"{"completed":"yes"}"#).is_err());
        assert!(Todo::from_json("not json").is_err());
    }

    #[test]
    fn test_is_completed_defaults_to_false() {
        assert!(!Todo::default().is_completed());
        assert!(Todo::example(1).title.is_some());
    }
}
