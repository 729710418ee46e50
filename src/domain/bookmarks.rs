use serde_json::{json, Value};

/// Ids of the posts a user bookmarked, in bookmarking order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bookmarks(Vec<String>);

impl Bookmarks {
    /// Reads `bookmarked_posts`. Missing lists are empty and non-string entries are skipped.
    pub fn from_metadata(value: Option<&Value>) -> Self {
        let post_ids = value
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self(post_ids)
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.0.iter().any(|id| id == post_id)
    }

    /// Appends `post_id`. Returns false, leaving the list untouched, when it is already there.
    pub fn add(&mut self, post_id: &str) -> bool {
        if self.contains(post_id) {
            return false;
        }

        self.0.push(post_id.to_string());
        true
    }

    pub fn remove(&mut self, post_id: &str) {
        self.0.retain(|id| id != post_id);
    }

    pub fn post_ids(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_metadata(&self) -> Value {
        json!({ "bookmarked_posts": self.0 })
    }
}
