//! Error types for sparsering
//!
//! Kernels return [`Result`]; the caller-visible return code of a call is
//! [`Rc::from_result`] of that result. Every [`Error`] maps onto exactly one
//! [`Rc`] via [`Error::rc`].

use crate::dtype::DType;
use std::fmt;
use thiserror::Error;

/// Result type alias using sparsering's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Return codes surfaced by every primitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rc {
    /// The call completed
    Success,
    /// A precondition on values, capacity, or state does not hold
    Illegal,
    /// Dimensions or domains of the arguments disagree
    Mismatch,
    /// An output aliases an input where that is not allowed
    Overlap,
    /// Reserved for iterative callers that fail to converge
    Failed,
    /// An allocation failed; the target is unmodified
    OutOfMem,
    /// Unrecoverable; all containers involved have undefined contents
    Panic,
    /// The requested configuration is not available
    Unsupported,
}

impl Rc {
    /// Code of a finished call.
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Rc::Success,
            Err(e) => e.rc(),
        }
    }

    /// Upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Rc::Success => "SUCCESS",
            Rc::Illegal => "ILLEGAL",
            Rc::Mismatch => "MISMATCH",
            Rc::Overlap => "OVERLAP",
            Rc::Failed => "FAILED",
            Rc::OutOfMem => "OUTOFMEM",
            Rc::Panic => "PANIC",
            Rc::Unsupported => "UNSUPPORTED",
        }
    }
}

impl fmt::Display for Rc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur in sparsering operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Sizes of the arguments disagree
    #[error("Dimension mismatch in '{op}': expected {expected}, got {got}")]
    DimensionMismatch {
        /// The primitive that detected it
        op: &'static str,
        /// Expected extent
        expected: usize,
        /// Actual extent
        got: usize,
    },

    /// Domains differ while `no_casting` is requested
    #[error("Domain mismatch in '{op}': expected {expected}, got {got}")]
    DomainMismatch {
        /// The primitive that detected it
        op: &'static str,
        /// Expected domain
        expected: DType,
        /// Actual domain
        got: DType,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Size of the dimension
        size: usize,
    },

    /// Output capacity is too small for the result
    #[error("Insufficient capacity: {required} nonzeroes required, capacity is {capacity}")]
    InsufficientCapacity {
        /// Nonzeroes the result needs
        required: usize,
        /// Current capacity
        capacity: usize,
    },

    /// A coordinate occurs twice in a build that demands uniqueness
    #[error("Duplicate entry at ({row}, {col})")]
    DuplicateEntry {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// A vector index occurs twice in a build that demands uniqueness
    #[error("Duplicate entry at index {index}")]
    DuplicateIndex {
        /// The repeated index
        index: usize,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Output and input are the same container
    #[error("Output of '{op}' overlaps an input")]
    Overlap {
        /// The primitive that detected it
        op: &'static str,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} elements")]
    OutOfMemory {
        /// Requested number of elements
        size: usize,
    },

    /// Feature not available in this build or configuration
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Description of the unavailable feature
        feature: String,
    },

    /// Iterative computation did not converge
    #[error("Failed: {reason}")]
    Failed {
        /// What did not converge
        reason: String,
    },

    /// Invariant violation
    #[error("Panic: {reason}")]
    Panic {
        /// What went wrong
        reason: String,
    },
}

impl Error {
    /// Return code of this error.
    pub fn rc(&self) -> Rc {
        match self {
            Error::DimensionMismatch { .. }
            | Error::DomainMismatch { .. }
            | Error::IndexOutOfBounds { .. } => Rc::Mismatch,
            Error::InsufficientCapacity { .. }
            | Error::DuplicateEntry { .. }
            | Error::DuplicateIndex { .. }
            | Error::InvalidArgument { .. } => Rc::Illegal,
            Error::Overlap { .. } => Rc::Overlap,
            Error::OutOfMemory { .. } => Rc::OutOfMem,
            Error::Unsupported { .. } => Rc::Unsupported,
            Error::Failed { .. } => Rc::Failed,
            Error::Panic { .. } => Rc::Panic,
        }
    }

    /// Create a dimension mismatch error
    pub fn mismatch(op: &'static str, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { op, expected, got }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create an unsupported feature error
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }
}

/// Emit the diagnostic for a failed primitive.
pub(crate) fn log_failure(op: &'static str, err: &Error) {
    tracing::warn!(primitive = op, rc = %err.rc(), "{err}");
}

/// Grow `v` by `additional` elements, reporting the request size on failure.
pub(crate) fn try_reserve<T>(v: &mut Vec<T>, additional: usize) -> Result<()> {
    v.try_reserve(additional)
        .map_err(|_| Error::OutOfMemory { size: additional })
}
