#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Check registry and execution harness
//!
//! A [`CheckRegistry`] is an ordered list of named checks. Every check sees
//! the same opened workbook and context. A check that returns an error or
//! panics yields a failed outcome carrying the error text; the remaining
//! checks still run, so a successful run always produces one outcome per
//! registered check.
//!
//! Duplicate names are allowed. Each registration runs and reports its own
//! outcome.

pub mod builtin;

use sheetcheck_errors::CheckError;
use sheetcheck_types::{CheckContext, CheckOutcome, CheckVerdict};
use sheetcheck_workbook::{SheetNameMapper, Workbook, Worksheet};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Signature every check must have
pub type CheckFn =
    dyn Fn(&Workbook, &CheckContext) -> Result<CheckVerdict, CheckError> + Send + Sync;

struct RegisteredCheck {
    name: String,
    check: Box<CheckFn>,
}

/// Ordered collection of named checks
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<RegisteredCheck>,
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.names())
            .finish()
    }
}

impl CheckRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in checks
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        builtin::register_defaults(&mut registry);
        registry
    }

    /// Append a named check
    pub fn register<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&Workbook, &CheckContext) -> Result<CheckVerdict, CheckError> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(check = %name, position = self.checks.len(), "registered check");
        self.checks.push(RegisteredCheck {
            name,
            check: Box::new(check),
        });
        self
    }

    /// Check names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check in registration order
    ///
    /// The returned list always has exactly [`Self::len`] entries.
    #[must_use]
    pub fn run_all(&self, workbook: &Workbook, context: &CheckContext) -> Vec<CheckOutcome> {
        self.checks
            .iter()
            .map(|registered| {
                let verdict = match run_isolated(registered, workbook, context) {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        warn!(
                            check = %registered.name,
                            entity = %context.entity,
                            document = %context.document,
                            error = %e,
                            "check raised an error"
                        );
                        CheckVerdict::fail(e.to_string())
                    }
                };
                CheckOutcome::new(registered.name.clone(), verdict)
            })
            .collect()
    }
}

fn run_isolated(
    registered: &RegisteredCheck,
    workbook: &Workbook,
    context: &CheckContext,
) -> Result<CheckVerdict, CheckError> {
    catch_unwind(AssertUnwindSafe(|| (registered.check)(workbook, context))).unwrap_or_else(
        |payload| {
            Err(CheckError::Panicked {
                check: registered.name.clone(),
                message: panic_message(payload.as_ref()),
            })
        },
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Look up a sheet by its German reference name, whatever the template language
///
/// # Errors
/// Returns [`CheckError::SheetMissing`] if the workbook has no matching sheet.
pub fn reference_sheet<'a>(
    workbook: &'a Workbook,
    german_reference: &str,
) -> Result<&'a Worksheet, CheckError> {
    SheetNameMapper::new(workbook)
        .sheet(german_reference)
        .ok_or_else(|| CheckError::SheetMissing {
            sheet: german_reference.to_string(),
        })
}
