//! Construction-time validation: the structural check catalogue and the
//! terminology delegation seam.

pub mod support;

mod terminology;

pub use terminology::{BindingStrength, TerminologyProvider, check_coding_binding};
