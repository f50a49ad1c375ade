//! Extracted entity tree nodes.

use serde::{Deserialize, Serialize};

/// One occurrence of a named entity found in the predicted text.
///
/// A leaf carries the extracted `text`; a composite entity carries
/// `children` instead. When the service returned verbose extraction
/// information, `text` holds the exact span and `position` its character
/// offset, for composites as well as leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionInstance {
    entity_name: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    position: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ExtractionInstance>,
}

impl ExtractionInstance {
    /// Creates a node from all of its parts.
    pub fn new(
        entity_name: impl Into<String>,
        text: Option<String>,
        position: Option<usize>,
        children: Vec<ExtractionInstance>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            text,
            position,
            children,
        }
    }

    /// Creates a leaf node holding extracted text without a position.
    pub fn leaf(entity_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(entity_name, Some(text.into()), None, Vec::new())
    }

    /// Creates a composite node with no text of its own.
    pub fn composite(entity_name: impl Into<String>, children: Vec<ExtractionInstance>) -> Self {
        Self::new(entity_name, None, None, children)
    }

    /// Replaces text and position with verbose span data, keeping the children.
    #[must_use]
    pub fn with_span(self, text: Option<String>, position: Option<usize>) -> Self {
        Self {
            text,
            position,
            ..self
        }
    }

    /// Name of the entity this node is an instance of.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Extracted text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Character offset of the extracted text in the query.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Nested entities, in the order the service returned them.
    pub fn children(&self) -> &[ExtractionInstance] {
        &self.children
    }

    /// Returns `true` if this node has no nested entities.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over this node and all of its descendants, depth first.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order, depth-first iterator over an extraction tree.
///
/// Created by [`ExtractionInstance::walk`] and [`PredictionResult::walk`].
///
/// [`PredictionResult::walk`]: crate::PredictionResult::walk
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<&'a ExtractionInstance>,
}

impl<'a> Walk<'a> {
    pub(crate) fn over(roots: &'a [ExtractionInstance]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ExtractionInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionInstance {
        ExtractionInstance::composite(
            "address",
            vec![
                ExtractionInstance::leaf("street", "1 Main St"),
                ExtractionInstance::composite(
                    "city",
                    vec![ExtractionInstance::leaf("zip", "98052")],
                ),
            ],
        )
    }

    #[test]
    fn test_walk_is_pre_order() {
        let root = sample();
        let names: Vec<_> = root.walk().map(ExtractionInstance::entity_name).collect();
        assert_eq!(names, ["address", "street", "city", "zip"]);
    }

    #[test]
    fn test_with_span_keeps_children() {
        let node = sample().with_span(Some("1 Main St, 98052".into()), Some(12));
        assert_eq!(node.text(), Some("1 Main St, 98052"));
        assert_eq!(node.position(), Some(12));
        assert_eq!(node.children().len(), 2);
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_serialize_camel_case() {
        let node = ExtractionInstance::new("a", Some("hello".into()), Some(5), Vec::new());
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"entityName": "a", "text": "hello", "position": 5})
        );
    }
}
