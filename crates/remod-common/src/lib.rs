pub mod diagnostics;

pub use diagnostics::{Diagnostic, DiagnosticCategory};
