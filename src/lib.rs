//! Exchange Definitions
//!
//! Single source of truth for the message-exchange topology and literal
//! vocabularies shared between services written in different languages.
//!
//! ## Features
//!
//! - **Exchange topology**: name, kind and declaration flags of each exchange
//! - **Closed vocabularies**: routing keys and status literals as typed sets
//! - **Code generation**: Rust, C++, JavaScript and TypeScript copies from one manifest
//! - **Drift detection**: checked-in copies compared against generated output
//!
//! ## Layout
//!
//! ```text
//! definitions/
//! └── preprocessor_status.toml    language-neutral manifest (embedded)
//! schema/
//! └── exchange-definition.schema.json
//! src/definitions/
//! └── preprocessor_status.rs      generated Rust copy
//! bindings/
//! ├── cpp/preprocessor_status.h
//! ├── js/preprocessor_status.js
//! └── ts/preprocessor_status.ts
//! ```
//!
//! ## Usage
//!
//! ```
//! use exchange_definitions::definitions::preprocessor_status;
//! use exchange_definitions::{ExchangeKind, StreamStatus};
//!
//! assert_eq!(preprocessor_status::INFO.name(), "ebu-list.preprocessor.status");
//! assert_eq!(preprocessor_status::INFO.kind, ExchangeKind::Fanout);
//! assert_eq!(StreamStatus::Started.to_string(), "Started");
//! ```

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod definitions;
pub mod drift;
pub mod error;
pub mod exchange;
pub mod manifest;
pub mod registry;
pub mod vocabulary;

pub use checksum::Checksum;
pub use codegen::{generate, GeneratedCopy, Language, RenderProfile};
pub use config::DefinitionsConfig;
pub use drift::{DriftReport, Target, TargetStatus};
pub use error::{DefinitionError, Result};
pub use exchange::{ExchangeInfo, ExchangeKind};
pub use manifest::{ExchangeDefinition, Literal, Vocabulary};
pub use registry::ExchangeRegistry;
pub use vocabulary::{ClosedVocabulary, PreprocessorStatusKey, StreamStatus};
