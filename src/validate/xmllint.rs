use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use super::{SchemaValidator, SchemaViolation};

/// Validates against an XSD set by running `xmllint --noout --schema`.
///
/// The schema can live on disk already ([`XmllintValidator::new`]) or be
/// extracted from an in-memory bundle into a temporary directory that is
/// removed when the validator is dropped ([`XmllintValidator::from_bundle`]).
#[derive(Debug)]
pub struct XmllintValidator {
    program: PathBuf,
    schema: PathBuf,
    _workdir: Option<TempDir>,
}

impl XmllintValidator {
    /// Use the main schema document at `schema`, e.g. `maindoc/UBL-Invoice-2.1.xsd`.
    pub fn new(schema: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("xmllint"),
            schema: schema.into(),
            _workdir: None,
        }
    }

    /// Write `files` (relative path, content) into a fresh temporary
    /// directory and validate against `main` inside it.
    pub fn from_bundle(files: &[(&str, &[u8])], main: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("xsd").tempdir()?;
        for (rel, content) in files {
            let target = dir.path().join(rel);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, content)?;
        }
        tracing::debug!(dir = %dir.path().display(), files = files.len(), "extracted XSD bundle");
        Ok(Self {
            program: PathBuf::from("xmllint"),
            schema: dir.path().join(main),
            _workdir: Some(dir),
        })
    }

    /// Override the xmllint executable.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema
    }
}

impl SchemaValidator for XmllintValidator {
    fn validate(&self, xml: &[u8]) -> Result<(), Vec<SchemaViolation>> {
        let failed = |what: &str, e: std::io::Error| {
            vec![SchemaViolation::new(
                None,
                format!("{what} {}: {e}", self.program.display()),
            )]
        };

        let mut child = Command::new(&self.program)
            .arg("--noout")
            .arg("--schema")
            .arg(&self.schema)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failed("failed to start", e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(xml)
                .map_err(|e| failed("failed to write to", e))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| failed("failed to wait for", e))?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let violations = parse_xmllint_output(&stderr);
        tracing::debug!(count = violations.len(), "xmllint reported violations");
        if violations.is_empty() {
            Err(vec![SchemaViolation::new(None, stderr.trim().to_string())])
        } else {
            Err(violations)
        }
    }
}

/// Extract `-:LINE: message` diagnostics from xmllint's stderr.
fn parse_xmllint_output(stderr: &str) -> Vec<SchemaViolation> {
    stderr
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("-:")?;
            let (num, message) = rest.split_once(':')?;
            let num = num.trim().parse().ok()?;
            Some(SchemaViolation::new(Some(num), message.trim()))
        })
        .collect()
}
