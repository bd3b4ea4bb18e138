use serde::{Deserialize, Deserializer};

/// Body of `POST /api/tasks`.
///
/// `title` is an `Option` so a missing title comes back as a per-field
/// validation error instead of a serde rejection. Anything else the client
/// sends (`owner_id`, `completed`, ...) is dropped on deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body of `PUT /api/tasks/{id}`. Every field is optional; an absent field
/// leaves the stored value untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    /// `None` = not in the request; `Some(None)` = explicit null, clears the
    /// description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_distinguishes_absent_from_null_description() {
        let absent: UpdateTask = serde_json::from_value(json!({ "completed": true })).unwrap();
        assert_eq!(absent.description, None);

        let null: UpdateTask = serde_json::from_value(json!({ "description": null })).unwrap();
        assert_eq!(null.description, Some(None));

        let set: UpdateTask = serde_json::from_value(json!({ "description": "d" })).unwrap();
        assert_eq!(set.description, Some(Some("d".to_string())));
    }

    #[test]
    fn create_drops_unknown_fields() {
        let body: CreateTask = serde_json::from_value(json!({
            "title": "x",
            "completed": true,
            "owner_id": "a2c9a1f0-0000-0000-0000-000000000000"
        }))
        .unwrap();
        assert_eq!(body.title.as_deref(), Some("x"));
        assert_eq!(body.description, None);
    }
}
