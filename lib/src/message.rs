//! The single message surface every pipeline reports to.

use crate::error::MarkportError;
use serde_json::Value;
use std::error::Error;

/// Something to show in the message box
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Failure {
        name: String,
        message: String,
        /// Causes, outermost first
        trace: Vec<String>,
    },
    /// Arbitrary value: arrays show one element per line, objects as JSON
    Value(Value),
}

impl MessageContent {
    pub fn render(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Failure {
                name,
                message,
                trace,
            } => {
                let mut out = format!("{}: {}", name, message);
                for line in trace {
                    out.push_str("\n    caused by: ");
                    out.push_str(line);
                }
                out
            }
            MessageContent::Value(Value::Array(items)) => items
                .iter()
                .map(value_text)
                .collect::<Vec<_>>()
                .join("\n"),
            MessageContent::Value(value) => value_text(value),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, MessageContent::Failure { .. })
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<&MarkportError> for MessageContent {
    fn from(err: &MarkportError) -> Self {
        let mut trace = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }

        MessageContent::Failure {
            name: err.name().to_string(),
            message: err.to_string(),
            trace,
        }
    }
}

impl From<MarkportError> for MessageContent {
    fn from(err: MarkportError) -> Self {
        MessageContent::from(&err)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<Value> for MessageContent {
    fn from(value: Value) -> Self {
        MessageContent::Value(value)
    }
}

/// Dismissible message box; starts hidden
#[derive(Debug, Clone, Default)]
pub struct MessageBox {
    current: Option<MessageContent>,
    visible: bool,
}

impl MessageBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current message and show the box
    pub fn spawn(&mut self, content: impl Into<MessageContent>) {
        self.current = Some(content.into());
        self.visible = true;
    }

    /// Any click on the box hides it
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> Option<&MessageContent> {
        self.current.as_ref()
    }

    /// Rendered text of the shown message, `None` while hidden
    pub fn text(&self) -> Option<String> {
        if !self.visible {
            return None;
        }
        self.current.as_ref().map(MessageContent::render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_box_starts_hidden() {
        let message_box = MessageBox::new();
        assert!(!message_box.is_visible());
        assert!(message_box.text().is_none());
    }

    #[test]
    fn test_spawn_and_dismiss() {
        let mut message_box = MessageBox::new();
        message_box.spawn("Successfully exported");
        assert_eq!(message_box.text().as_deref(), Some("Successfully exported"));

        message_box.dismiss();
        assert!(message_box.text().is_none());
        // The content stays around until replaced
        assert!(message_box.content().is_some());
    }

    #[test]
    fn test_error_rendering_has_name_and_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "bookmarks.json: denied");
        let err = MarkportError::from(io);
        let text = MessageContent::from(&err).render();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("IoError: I/O error: bookmarks.json: denied"));
        assert_eq!(lines.next(), Some("    caused by: bookmarks.json: denied"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_error_without_source() {
        let err = MarkportError::Json("expected value at line 1 column 1".to_string());
        let content = MessageContent::from(err);
        assert!(content.is_failure());
        assert_eq!(
            content.render(),
            "JsonError: JSON error: expected value at line 1 column 1"
        );
    }

    #[rstest]
    #[case(json!(["first", 2, true]), "first\n2\ntrue")]
    #[case(json!({"code": 3}), "{\"code\":3}")]
    #[case(json!("plain"), "plain")]
    #[case(json!(42), "42")]
    fn test_value_rendering(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(MessageContent::from(value).render(), expected);
    }
}
