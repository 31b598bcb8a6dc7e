use gausscheck_core::{GpError, LinalgError};
use thiserror::Error;

/// Failure of one conformance-verification call.
///
/// `EqualLengthIndexSets` signals misuse of the harness and is raised before
/// any property runs; `Property` is the primary output channel and names the
/// first violated check; `Gp` is a failure inside the object under test,
/// passed through unmodified.
#[derive(Debug, Error)]
pub enum ConformanceError {
    #[error("process-level checks need index sets of differing length, both have {len}")]
    EqualLengthIndexSets { len: usize },
    #[error("property '{property}' violated: {detail}")]
    Property {
        property: &'static str,
        detail: String,
    },
    #[error(transparent)]
    Gp(#[from] GpError),
    #[error("harness-internal eigenvalue computation failed: {0}")]
    Linalg(#[from] LinalgError),
}

impl ConformanceError {
    /// Name of the violated property, if this is a property violation.
    pub fn property(&self) -> Option<&'static str> {
        match self {
            ConformanceError::Property { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// Fail-fast check helper: the detail closure only runs on violation.
pub(crate) fn ensure<F: FnOnce() -> String>(
    property: &'static str,
    ok: bool,
    detail: F,
) -> Result<(), ConformanceError> {
    if ok {
        tracing::trace!(property, "check passed");
        Ok(())
    } else {
        Err(ConformanceError::Property {
            property,
            detail: detail(),
        })
    }
}
