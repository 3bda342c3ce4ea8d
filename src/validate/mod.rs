//! Boundary to schema validation.
//!
//! The invoice core never validates its own output. A [`SchemaValidator`]
//! takes the serialized bytes and reports the violations it finds:
//!
//! - [`StructuralValidator`] runs in-process and checks well-formedness,
//!   the root element and the UBL order of top-level elements.
//! - [`XmllintValidator`] runs `xmllint` against a caller-supplied XSD set.

mod structural;
mod xmllint;

pub use structural::StructuralValidator;
pub use xmllint::XmllintValidator;

/// One schema violation with the 1-based line it was found on, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub line: Option<usize>,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Accepts a serialized document and reports whether it conforms.
pub trait SchemaValidator {
    /// `Ok(())` when the document passes, otherwise every violation found,
    /// first violation first.
    fn validate(&self, xml: &[u8]) -> Result<(), Vec<SchemaViolation>>;
}
