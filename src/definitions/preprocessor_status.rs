//! Generated from exchange definition `preprocessor_status` v1.0.0 - DO NOT EDIT
//!
//! Exchange `ebu-list.preprocessor.status` (fanout).
//! Fingerprint: 42fc805fe7944165d7ca6c0a36c488336c1226724ebd05f7039c5fdce46b2267
//! Regenerate with `exchange-defs generate`.

use crate::{ExchangeInfo, ExchangeKind};

pub const INFO: ExchangeInfo = ExchangeInfo::new(
    "ebu-list.preprocessor.status",
    ExchangeKind::Fanout,
    false,
    false,
    false,
);

pub mod keys {
    pub const ANNOUNCE: &str = "announce";

    pub const ALL: &[&str] = &[ANNOUNCE];
}

pub mod announce {
    pub mod stream_status {
        pub const STARTED: &str = "Started";
        pub const STOPPED: &str = "Stopped";
        pub const FAILED: &str = "Failed";

        pub const ALL: &[&str] = &[STARTED, STOPPED, FAILED];
    }
}
