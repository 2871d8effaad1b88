//! Formatting failures.
//!
//! Malformed records are contract violations in the upstream scan: they
//! abort formatting of the current module and surface as a compiler error
//! referencing the offending statement. There is no retry; a failure never
//! partially mutates sibling modules.

use remod_ast::Span;
use remod_common::Diagnostic;
use remod_common::diagnostics::diagnostic_codes;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("malformed import record: {detail}")]
    MalformedImport { span: Span, detail: String },

    #[error("malformed export record: {detail}")]
    MalformedExport { span: Span, detail: String },
}

impl FormatError {
    pub fn malformed_import(span: Span, detail: impl Into<String>) -> Self {
        FormatError::MalformedImport {
            span,
            detail: detail.into(),
        }
    }

    pub fn malformed_export(span: Span, detail: impl Into<String>) -> Self {
        FormatError::MalformedExport {
            span,
            detail: detail.into(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            FormatError::MalformedImport { span, .. } | FormatError::MalformedExport { span, .. } => {
                *span
            }
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            FormatError::MalformedImport { .. } => diagnostic_codes::MALFORMED_IMPORT_RECORD,
            FormatError::MalformedExport { .. } => diagnostic_codes::MALFORMED_EXPORT_RECORD,
        }
    }

    /// Driver-facing diagnostic pointing at the offending statement.
    pub fn to_diagnostic(&self, filename: &str) -> Diagnostic {
        let span = self.span();
        Diagnostic::error(filename, span.start, span.len(), self.to_string(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_points_at_the_offending_span() {
        let err = FormatError::malformed_export(Span::new(12, 40), "no local binding");
        let diag = err.to_diagnostic("src/mod.js");
        assert_eq!(diag.start, 12);
        assert_eq!(diag.length, 28);
        assert_eq!(diag.code, 9102);
        assert!(diag.message_text.contains("no local binding"));
    }
}
