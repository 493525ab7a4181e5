use serde::{Deserialize, Serialize};

/// A unit of extracted document text with its positional metadata.
///
/// Passages exist only for the duration of one request: the loader produces
/// them, the index embeds them, and everything is dropped when the request
/// handler returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
    pub content: String,
    /// 1-based page number for paginated sources; absent for plain text.
    pub page_label: Option<String>,
}

impl Passage {
    pub fn new(content: impl Into<String>, page_label: Option<String>) -> Self {
        Self {
            content: content.into(),
            page_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passage_page_label_roundtrip() {
        let with_page = Passage::new("policy text", Some("3".to_string()));
        assert_eq!(with_page.page_label.as_deref(), Some("3"));

        let without_page = Passage::new("plain text", None);
        assert!(without_page.page_label.is_none());
    }
}
