//! Double-dispatch traversal protocol.
//!
//! Every node implements [`Visitable`] once; generic consumers (diff tools,
//! encoders, redaction, copy utilities) implement [`Visitor`] and never
//! branch per concrete type. The state machine per node is:
//!
//! ```text
//! if visitor.pre_visit(node) {
//!     visitor.visit_start(name, index, node);
//!     if visitor.visit(name, index, node) {
//!         // children, in schema declaration order
//!     }
//!     visitor.visit_end(name, index, node);
//!     visitor.post_visit(node);
//! }
//! ```
//!
//! Returning `false` from `pre_visit` skips the node and its subtree with no
//! further calls; returning `false` from `visit` skips only the children —
//! `visit_end` and `post_visit` still fire. Absent fields produce no calls
//! at all. Traversal is synchronous and holds no state beyond what the
//! visitor itself carries.

mod collecting;

pub use collecting::CollectingVisitor;

/// A node that can be traversed.
///
/// The `'m` lifetime ties visited node references to the model tree, so a
/// visitor may retain them past the walk.
pub trait Visitable {
    /// Run the traversal state machine for this node.
    ///
    /// `element_name` is the schema name of the field holding this node;
    /// `element_index` is the position for repeating fields and `None` for
    /// singular ones.
    fn accept<'m>(
        &'m self,
        element_name: &str,
        element_index: Option<usize>,
        visitor: &mut dyn Visitor<'m>,
    );

    /// The node's schema type name (primitive names in lower case).
    fn type_name(&self) -> &'static str;
}

/// The five-hook traversal contract.
///
/// All hooks have pass-through defaults so a consumer only overrides what it
/// observes.
pub trait Visitor<'m> {
    /// Return false to veto the node and its entire subtree.
    fn pre_visit(&mut self, node: &'m dyn Visitable) -> bool {
        let _ = node;
        true
    }

    /// Side-effect hook; fires for every node that passed `pre_visit`.
    fn visit_start(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        let _ = (element_name, element_index, node);
    }

    /// Return false to veto descending into children; `visit_end` and
    /// `post_visit` still fire for this node.
    fn visit(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) -> bool {
        let _ = (element_name, element_index, node);
        true
    }

    fn visit_end(&mut self, element_name: &str, element_index: Option<usize>, node: &'m dyn Visitable) {
        let _ = (element_name, element_index, node);
    }

    fn post_visit(&mut self, node: &'m dyn Visitable) {
        let _ = node;
    }
}

/// Run the per-node state machine around a declarative children closure.
///
/// Every `accept` implementation funnels through here so the hook order is
/// defined in exactly one place.
pub(crate) fn accept_node<'m, T, F>(
    node: &'m T,
    element_name: &str,
    element_index: Option<usize>,
    visitor: &mut dyn Visitor<'m>,
    children: F,
) where
    T: Visitable,
    F: FnOnce(&'m T, &mut dyn Visitor<'m>),
{
    if !visitor.pre_visit(node) {
        return;
    }
    visitor.visit_start(element_name, element_index, node);
    if visitor.visit(element_name, element_index, node) {
        children(node, &mut *visitor);
    }
    visitor.visit_end(element_name, element_index, node);
    visitor.post_visit(node);
}

/// Visit an optional singular field; absent fields produce no calls.
pub fn visit<'m, T: Visitable>(
    node: &'m Option<T>,
    element_name: &str,
    visitor: &mut dyn Visitor<'m>,
) {
    if let Some(node) = node {
        node.accept(element_name, None, visitor);
    }
}

/// Visit a repeating field element by element, in list order, passing each
/// element's position as its index.
pub fn visit_all<'m, T: Visitable>(
    nodes: &'m [T],
    element_name: &str,
    visitor: &mut dyn Visitor<'m>,
) {
    for (index, node) in nodes.iter().enumerate() {
        node.accept(element_name, Some(index), visitor);
    }
}
