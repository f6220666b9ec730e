//! Exchange topology descriptors

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Broker-side routing behaviour of an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    /// Every published message goes to every bound queue
    Fanout,
    /// Routing key must equal the binding key
    Direct,
    /// Dot-separated routing keys matched against `*` / `#` patterns
    Topic,
    /// Routed on message headers; the routing key is ignored
    Headers,
}

impl ExchangeKind {
    /// Wire-level name of the kind, as declared to the broker
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExchangeKind::Fanout => "fanout",
            ExchangeKind::Direct => "direct",
            ExchangeKind::Topic => "topic",
            ExchangeKind::Headers => "headers",
        }
    }

    /// Whether a message published with `routing_key` reaches a queue bound
    /// with `binding_key`.
    ///
    /// Header exchanges never route on the key, so this returns `false` for
    /// them: header matching belongs to the messaging client.
    pub fn routes(&self, binding_key: &str, routing_key: &str) -> bool {
        match self {
            ExchangeKind::Fanout => true,
            ExchangeKind::Direct => binding_key == routing_key,
            ExchangeKind::Topic => {
                let pattern: Vec<&str> = binding_key.split('.').collect();
                let words: Vec<&str> = routing_key.split('.').collect();
                topic_matches(&pattern, &words)
            }
            ExchangeKind::Headers => false,
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn topic_matches(pattern: &[&str], words: &[&str]) -> bool {
    match (pattern.first(), words.first()) {
        (None, None) => true,
        (Some(&"#"), _) => {
            // `#` swallows zero words, or one word and stays in place
            topic_matches(&pattern[1..], words)
                || (!words.is_empty() && topic_matches(pattern, &words[1..]))
        }
        (Some(&"*"), Some(_)) => topic_matches(&pattern[1..], &words[1..]),
        (Some(p), Some(w)) if p == w => topic_matches(&pattern[1..], &words[1..]),
        _ => false,
    }
}

/// Describes one message exchange
///
/// Compiled-in copies are built with [`ExchangeInfo::new`] in `const`
/// context; manifest copies are deserialized. Both compare equal when they
/// describe the same exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeInfo {
    /// Wire-level exchange name, unique within the deployment
    pub name: Cow<'static, str>,
    /// Routing topology
    pub kind: ExchangeKind,
    /// Survives a broker restart
    #[serde(default)]
    pub durable: bool,
    /// Deleted by the broker once the last binding is removed
    #[serde(default)]
    pub auto_delete: bool,
    /// Cannot be published to directly by clients
    #[serde(default)]
    pub internal: bool,
}

impl ExchangeInfo {
    pub const fn new(
        name: &'static str,
        kind: ExchangeKind,
        durable: bool,
        auto_delete: bool,
        internal: bool,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind,
            durable,
            auto_delete,
            internal,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ExchangeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, durable={}, auto_delete={}, internal={})",
            self.name, self.kind, self.durable, self.auto_delete, self.internal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fanout_ignores_routing_key() {
        let kind = ExchangeKind::Fanout;
        assert!(kind.routes("", "announce"));
        assert!(kind.routes("announce", "something.else"));
    }

    #[test]
    fn test_direct_requires_exact_key() {
        let kind = ExchangeKind::Direct;
        assert!(kind.routes("announce", "announce"));
        assert!(!kind.routes("announce", "Announce"));
        assert!(!kind.routes("announce", "announce.extra"));
    }

    #[test]
    fn test_topic_wildcards() {
        let kind = ExchangeKind::Topic;
        assert!(kind.routes("stream.*.status", "stream.video.status"));
        assert!(!kind.routes("stream.*.status", "stream.status"));
        assert!(kind.routes("stream.#", "stream"));
        assert!(kind.routes("stream.#", "stream.video.status"));
        assert!(kind.routes("#.status", "stream.video.status"));
        assert!(!kind.routes("stream.*", "stream.video.status"));
        assert!(kind.routes("#", "anything.at.all"));
    }

    #[test]
    fn test_headers_never_route_on_key() {
        assert!(!ExchangeKind::Headers.routes("announce", "announce"));
    }

    #[test]
    fn test_const_and_deserialized_info_compare_equal() {
        const INFO: ExchangeInfo =
            ExchangeInfo::new("ebu-list.preprocessor.status", ExchangeKind::Fanout, false, false, false);

        let parsed: ExchangeInfo = toml::from_str(
            r#"
            name = "ebu-list.preprocessor.status"
            kind = "fanout"
            "#,
        )
        .unwrap();

        assert_eq!(INFO, parsed);
        assert_eq!(parsed.kind.as_str(), "fanout");
    }
}
