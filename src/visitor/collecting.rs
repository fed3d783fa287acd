//! A visitor that accumulates every visited node.

use super::{Visitable, Visitor};

/// Walks a tree and collects a reference to every visited node, in
/// traversal (schema declaration) order.
///
/// Consumers filter the result by [`Visitable::type_name`] or downcast as
/// needed; the walk itself stays type-agnostic.
#[derive(Default)]
pub struct CollectingVisitor<'m> {
    result: Vec<&'m dyn Visitable>,
}

impl<'m> CollectingVisitor<'m> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> &[&'m dyn Visitable] {
        &self.result
    }

    pub fn into_result(self) -> Vec<&'m dyn Visitable> {
        self.result
    }
}

impl<'m> Visitor<'m> for CollectingVisitor<'m> {
    fn visit(
        &mut self,
        _element_name: &str,
        _element_index: Option<usize>,
        node: &'m dyn Visitable,
    ) -> bool {
        self.result.push(node);
        true
    }
}
