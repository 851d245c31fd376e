//! The structured document: extracted elements paired with resolved styles.

use serde::Serialize;

use crate::model::StructuralElement;
use crate::style::{StylePolicy, StyleRule};

/// One element and the style it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledBlock {
    pub element: StructuralElement,
    pub style: StyleRule,
}

/// Ordered sequence of styled blocks, in source order.
///
/// Created fresh for each conversion and consumed by the emitters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDocument {
    blocks: Vec<StyledBlock>,
}

impl StructuredDocument {
    pub fn blocks(&self) -> &[StyledBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyledBlock> {
        self.blocks.iter()
    }

    /// The elements without their styles.
    pub fn elements(&self) -> impl Iterator<Item = &StructuralElement> {
        self.blocks.iter().map(|b| &b.element)
    }
}

impl<'a> IntoIterator for &'a StructuredDocument {
    type Item = &'a StyledBlock;
    type IntoIter = std::slice::Iter<'a, StyledBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl Serialize for StructuredDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.elements())
    }
}

/// Resolve a style for every element, keeping their order.
///
/// Pure and total: nothing is merged, dropped or reordered, and an empty
/// element list gives an empty document.
pub fn build_document(
    elements: impl IntoIterator<Item = StructuralElement>,
    policy: &StylePolicy,
) -> StructuredDocument {
    let blocks: Vec<StyledBlock> = elements
        .into_iter()
        .map(|element| {
            let style = policy.resolve(element.kind(), element.level());
            StyledBlock { element, style }
        })
        .collect();

    tracing::debug!(blocks = blocks.len(), "built structured document");
    StructuredDocument { blocks }
}
