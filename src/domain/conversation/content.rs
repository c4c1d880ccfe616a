//! Typed content spans inside a conversation turn.

use serde::{Deserialize, Serialize};

/// The kind of text a content part carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Text typed by the end user.
    InputText,
    /// Text produced by a model.
    OutputText,
    /// Untyped text (legacy or imported history).
    Text,
}

impl ContentKind {
    /// Returns true if parts of this kind carry user-visible text.
    ///
    /// Every current kind does; the check exists so that future non-text
    /// kinds (images, files) are skipped by the redactor.
    pub fn is_text_bearing(&self) -> bool {
        matches!(self, Self::InputText | Self::OutputText | Self::Text)
    }
}

/// One typed text span.
///
/// # Invariants
///
/// - Exactly one text payload per part
/// - `kind` never changes after construction; only `text` may be rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    kind: ContentKind,
    text: String,
}

impl ContentPart {
    /// Creates a part of the given kind.
    pub fn new(kind: ContentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Creates an `input_text` part.
    pub fn input_text(text: impl Into<String>) -> Self {
        Self::new(ContentKind::InputText, text)
    }

    /// Creates an `output_text` part.
    pub fn output_text(text: impl Into<String>) -> Self {
        Self::new(ContentKind::OutputText, text)
    }

    /// Returns the kind of this part.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Returns the text payload.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text payload, keeping the kind.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let part = ContentPart::input_text("hello");
        let json = serde_json::to_value(&part).unwrap();

        assert_eq!(json["type"], "input_text");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn deserializes_plain_text_kind() {
        let part: ContentPart =
            serde_json::from_str(r#"{"type":"text","text":"imported"}"#).unwrap();

        assert_eq!(part.kind(), ContentKind::Text);
        assert_eq!(part.text(), "imported");
    }

    #[test]
    fn replace_text_preserves_kind() {
        let mut part = ContentPart::output_text("original");
        part.replace_text("rewritten");

        assert_eq!(part.kind(), ContentKind::OutputText);
        assert_eq!(part.text(), "rewritten");
    }

    #[test]
    fn all_kinds_are_text_bearing() {
        assert!(ContentKind::InputText.is_text_bearing());
        assert!(ContentKind::OutputText.is_text_bearing());
        assert!(ContentKind::Text.is_text_bearing());
    }
}
