//! Error types for ldap-frame.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without
//! breaking changes. End-of-stream is not an error: it is reported through
//! [`FrameOutcome::EndOfStream`](crate::framing::FrameOutcome).

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// BER length error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthErrorKind {
    /// Length does not fit in the 4-byte wire representation.
    TooLarge { length: usize },
    /// Long-form length declared more than 4 significant octets.
    DoesNotFit32Bits { octets: usize },
}

impl std::fmt::Display for LengthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { length } => {
                write!(f, "length {} exceeds the 32-bit wire limit", length)
            }
            Self::DoesNotFit32Bits { octets } => {
                write!(f, "{}-octet length value does not fit in 32 bits", octets)
            }
        }
    }
}

/// Attribute parse error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// TLV extends past the end of its enclosing window.
    TlvOverflow,
    /// Declared content range overflows the address space.
    RangeOverflow,
    /// Constructed attributes nested beyond the recursion limit.
    NestingTooDeep { limit: usize },
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TlvOverflow => write!(f, "TLV extends past end of data"),
            Self::RangeOverflow => write!(f, "content range overflows"),
            Self::NestingTooDeep { limit } => {
                write!(f, "attribute nesting exceeds limit of {}", limit)
            }
        }
    }
}

/// Attribute value access error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueErrorKind {
    /// Zero-length integer.
    ZeroLengthInteger,
    /// Integer value longer than 4 bytes.
    IntegerTooLong { length: usize },
    /// Boolean with length other than 1.
    InvalidBooleanLength { length: usize },
    /// String value is not valid UTF-8.
    InvalidUtf8,
    /// Expected child attribute is missing.
    MissingChild { index: usize },
    /// Value accessor used on a constructed attribute.
    NotPrimitive,
}

impl std::fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerTooLong { length } => {
                write!(f, "integer too long: {} bytes", length)
            }
            Self::InvalidBooleanLength { length } => {
                write!(f, "boolean must be 1 byte, got {}", length)
            }
            Self::InvalidUtf8 => write!(f, "value is not valid UTF-8"),
            Self::MissingChild { index } => {
                write!(f, "missing child attribute at index {}", index)
            }
            Self::NotPrimitive => write!(f, "constructed attribute has no primitive value"),
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error while reading from a byte source.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Fewer bytes available than a length field or content section declares.
    #[error("truncated input: need {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// Invalid or out-of-range BER length.
    #[error("malformed BER length: {kind}")]
    MalformedLength { kind: LengthErrorKind },

    /// Suspendable read aborted via cancellation token.
    #[error("read cancelled")]
    Cancelled,

    /// Attribute parser rejected the content bytes.
    #[error("parse error at offset {offset}: {kind}")]
    Parse { offset: usize, kind: ParseErrorKind },

    /// Attribute value could not be interpreted as the requested type.
    #[error("invalid attribute value: {kind}")]
    Value { kind: ValueErrorKind },
}

impl Error {
    /// Create a truncated-input error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::Truncated { needed, available }
    }

    /// Create a malformed-length error.
    pub fn length(kind: LengthErrorKind) -> Self {
        Self::MalformedLength { kind }
    }

    /// Create a parse error.
    pub fn parse(offset: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { offset, kind }
    }

    /// Create an attribute value error.
    pub fn value(kind: ValueErrorKind) -> Self {
        Self::Value { kind }
    }

    /// Whether this error indicates the source ran dry mid-structure.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
