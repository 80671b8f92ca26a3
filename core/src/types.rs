//! Per-call request options.
//!
//! # Design
//! Every option is independently omittable, so `RequestOptions` derives
//! `Default` and callers fill in only what a call needs. The convenience
//! verbs on `RequestAdapter` build these for the common shapes.

use serde_json::Value;

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name, e.g. `"file"`.
    pub field: String,
    pub file_name: String,
    /// Mime type; the transport guesses when absent.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Optional inputs to `RequestAdapter::arequest`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string parameters.
    pub params: Option<Vec<(String, String)>>,
    /// JSON request body.
    pub json: Option<Value>,
    /// Form fields. Sent urlencoded, or as multipart fields when `files` is set.
    pub data: Option<Vec<(String, String)>>,
    pub files: Option<Vec<FilePart>>,
    /// Header overrides for this call only.
    pub headers: Option<Vec<(String, String)>>,
}

impl RequestOptions {
    pub fn has_files(&self) -> bool {
        self.files.as_ref().is_some_and(|files| !files.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_empty() {
        let options = RequestOptions::default();
        assert!(options.params.is_none());
        assert!(options.json.is_none());
        assert!(!options.has_files());
    }

    #[test]
    fn empty_file_list_is_not_an_upload() {
        let options = RequestOptions {
            files: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!options.has_files());
    }

    #[test]
    fn file_part_builder() {
        let part = FilePart::new("file", "logo.png", vec![1, 2, 3]).with_content_type("image/png");
        assert_eq!(part.field, "file");
        assert_eq!(part.content_type.as_deref(), Some("image/png"));
    }
}
