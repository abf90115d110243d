use std::error::Error;
use std::fmt;

/// An error raised while decoding a genome's textual form.
///
/// Decoding never continues past a corrupted record; the caller
/// decides whether the failure is fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A record began with an unrecognized gene tag.
    UnknownGeneKind(String),
    /// A record had the wrong shape for its tag, or was unterminated.
    MalformedRecord(String),
    /// A record field failed to parse.
    InvalidField {
        record: String,
        field: &'static str,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGeneKind(record) => {
                write!(f, "unknown gene signature: {:?}", record)
            }
            Self::MalformedRecord(record) => {
                write!(f, "malformed gene record: {:?}", record)
            }
            Self::InvalidField { record, field } => {
                write!(f, "invalid {} field in gene record {:?}", field, record)
            }
        }
    }
}

impl Error for DecodeError {}
