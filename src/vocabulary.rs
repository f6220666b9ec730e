//! Typed views of closed literal sets
//!
//! Consumers decode received strings into these enums at the boundary and
//! reject anything outside the set instead of passing it through. The
//! string encoding of every variant is the compiled-in constant, so the
//! enums cannot drift from the generated definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::definitions::preprocessor_status::{announce::stream_status, keys};
use crate::error::{DefinitionError, Result};

/// A closed set of wire literals with one canonical encoding
pub trait ClosedVocabulary: Copy + Sized + 'static {
    /// Qualified vocabulary name, used in errors
    const VOCABULARY: &'static str;

    /// Every member, in declaration order
    const ALL: &'static [Self];

    /// The exact wire literal
    fn as_str(&self) -> &'static str;

    /// Decode a wire literal. No case folding, no trimming.
    fn parse_literal(value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.as_str() == value)
            .ok_or_else(|| DefinitionError::UnknownLiteral {
                vocabulary: Self::VOCABULARY.to_string(),
                value: value.to_string(),
            })
    }
}

/// Lifecycle state announced by the preprocessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StreamStatus {
    Started,
    Stopped,
    Failed,
}

impl ClosedVocabulary for StreamStatus {
    const VOCABULARY: &'static str = "preprocessor_status.announce.stream_status";
    const ALL: &'static [Self] = &[StreamStatus::Started, StreamStatus::Stopped, StreamStatus::Failed];

    fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Started => stream_status::STARTED,
            StreamStatus::Stopped => stream_status::STOPPED,
            StreamStatus::Failed => stream_status::FAILED,
        }
    }
}

/// Routing keys published on the preprocessor status exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PreprocessorStatusKey {
    Announce,
}

impl ClosedVocabulary for PreprocessorStatusKey {
    const VOCABULARY: &'static str = "preprocessor_status.keys";
    const ALL: &'static [Self] = &[PreprocessorStatusKey::Announce];

    fn as_str(&self) -> &'static str {
        match self {
            PreprocessorStatusKey::Announce => keys::ANNOUNCE,
        }
    }
}

impl FromStr for StreamStatus {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_literal(s)
    }
}

impl TryFrom<String> for StreamStatus {
    type Error = DefinitionError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_literal(&value)
    }
}

impl TryFrom<&str> for StreamStatus {
    type Error = DefinitionError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse_literal(value)
    }
}

impl From<StreamStatus> for String {
    fn from(status: StreamStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreprocessorStatusKey {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_literal(s)
    }
}

impl TryFrom<String> for PreprocessorStatusKey {
    type Error = DefinitionError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_literal(&value)
    }
}

impl TryFrom<&str> for PreprocessorStatusKey {
    type Error = DefinitionError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse_literal(value)
    }
}

impl From<PreprocessorStatusKey> for String {
    fn from(key: PreprocessorStatusKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for PreprocessorStatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
