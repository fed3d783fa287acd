//! Composition bases shared by every value-bearing node.
//!
//! The model has no deep inheritance tree: every concrete datatype embeds
//! [`ElementData`] (id + extensions), every backbone component embeds
//! [`BackboneData`] on top of it, and cross-cutting capabilities are plain
//! traits over those embedded structs.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::types::Extension;

/// Common data carried by every element: an optional id and the open-world
/// extension list. Embedded by composition into every datatype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) extension: Vec<Extension>,
}

impl ElementData {
    pub(crate) fn new(id: Option<String>, extension: Vec<Extension>) -> Self {
        Self { id, extension }
    }
}

/// [`ElementData`] plus modifier extensions. Embedded into backbone
/// components nested inside a resource.
///
/// A modifier extension changes the interpretation of its container; a
/// consumer that does not understand one must refuse to process the
/// element's content. The model only stores the list, it cannot enforce the
/// consumer-side rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackboneData {
    #[serde(flatten)]
    pub(crate) element: ElementData,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) modifier_extension: Vec<Extension>,
}

impl BackboneData {
    pub(crate) fn new(
        id: Option<String>,
        extension: Vec<Extension>,
        modifier_extension: Vec<Extension>,
    ) -> Self {
        Self {
            element: ElementData::new(id, extension),
            modifier_extension,
        }
    }
}

/// Capability trait for any value-bearing node.
pub trait Element {
    fn element(&self) -> &ElementData;

    fn id(&self) -> Option<&str> {
        self.element().id.as_deref()
    }

    fn extension(&self) -> &[Extension] {
        &self.element().extension
    }

    /// Whether the node carries a primitive value. Complex types never do.
    fn has_value(&self) -> bool {
        false
    }

    /// Whether any declared field is populated. The default covers the bare
    /// element; concrete types extend it with their own fields.
    fn has_children(&self) -> bool {
        !self.element().extension.is_empty()
    }
}

/// Capability trait for backbone components.
pub trait Backbone: Element {
    fn backbone(&self) -> &BackboneData;

    fn modifier_extension(&self) -> &[Extension] {
        &self.backbone().modifier_extension
    }
}

/// Lazily computed structural hash, cached per instance.
///
/// First-time computation from multiple threads is a benign idempotent race:
/// all threads derive the same value from the same frozen fields. The cache
/// takes no part in equality, hashing or serialization of its carrier.
#[derive(Default)]
pub struct HashMemo(OnceLock<u64>);

impl HashMemo {
    pub fn get_or_compute<T: Hash>(&self, value: &T) -> u64 {
        *self.0.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        })
    }
}

impl Clone for HashMemo {
    // A clone starts cold; the value is recomputed on demand.
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl PartialEq for HashMemo {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HashMemo {}

impl Hash for HashMemo {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl std::fmt::Debug for HashMemo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.get() {
            Some(value) => write!(f, "HashMemo({value})"),
            None => write!(f, "HashMemo(<unset>)"),
        }
    }
}

/// Memoized structural hash for frozen instances.
///
/// `a == b` implies `a.cached_hash() == b.cached_hash()` because both are
/// derived from the same declared fields.
pub trait CachedHash: Hash {
    fn hash_cache(&self) -> &HashMemo;

    fn cached_hash(&self) -> u64
    where
        Self: Sized,
    {
        self.hash_cache().get_or_compute(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_computes_once() {
        let memo = HashMemo::default();
        let first = memo.get_or_compute(&42u64);
        let second = memo.get_or_compute(&43u64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_memo_ignored_by_equality() {
        let warm = HashMemo::default();
        warm.get_or_compute(&1u8);
        assert_eq!(warm, HashMemo::default());
    }

    #[test]
    fn test_clone_starts_cold() {
        let memo = HashMemo::default();
        memo.get_or_compute(&7u32);
        let clone = memo.clone();
        assert!(clone.0.get().is_none());
    }
}
