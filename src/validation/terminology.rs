//! Delegation seam for terminology resolution.
//!
//! Whether a coded value belongs to a value set the model cannot enumerate
//! inline is answered by an external collaborator. The model only carries
//! the question.

use crate::error::{FhirModelError, Result};
use crate::types::Coding;

/// How strongly a coded field is bound to its value set. Only `Required`
/// bindings are enforced at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingStrength {
    Required,
    Extensible,
    Preferred,
    Example,
}

/// External terminology collaborator.
pub trait TerminologyProvider {
    /// Whether `code` (in `system`, when known) is a member of the value
    /// set identified by `value_set`.
    fn is_member(&self, value_set: &str, system: Option<&str>, code: &str) -> bool;
}

/// Check a coding against a value set through an external provider.
///
/// Bindings weaker than `Required` are never enforced; a coding without a
/// code carries nothing to check.
pub fn check_coding_binding(
    provider: &dyn TerminologyProvider,
    coding: &Coding,
    element_name: &str,
    value_set: &str,
    strength: BindingStrength,
) -> Result<()> {
    if strength != BindingStrength::Required {
        return Ok(());
    }
    let Some(code) = coding.code().and_then(|c| c.value()) else {
        return Ok(());
    };
    let system = coding.system().and_then(|s| s.value());
    if !provider.is_member(value_set, system, code) {
        tracing::debug!(element = element_name, code, value_set, "code rejected by terminology provider");
        return Err(FhirModelError::unbounded_coded_value(element_name, code, value_set));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedSet(&'static [&'static str]);

    impl TerminologyProvider for ClosedSet {
        fn is_member(&self, _value_set: &str, _system: Option<&str>, code: &str) -> bool {
            self.0.contains(&code)
        }
    }

    #[test]
    fn test_required_binding_enforced() {
        let provider = ClosedSet(&["final", "amended"]);
        let coding = Coding::builder().code("draft").build().unwrap();
        let err = check_coding_binding(
            &provider,
            &coding,
            "status",
            "http://example.org/ValueSet/status",
            BindingStrength::Required,
        )
        .unwrap_err();
        assert!(matches!(err, FhirModelError::UnboundedCodedValue { .. }));
    }

    #[test]
    fn test_weaker_bindings_skipped() {
        let provider = ClosedSet(&[]);
        let coding = Coding::builder().code("anything").build().unwrap();
        assert!(
            check_coding_binding(
                &provider,
                &coding,
                "category",
                "http://example.org/ValueSet/category",
                BindingStrength::Example,
            )
            .is_ok()
        );
    }
}
