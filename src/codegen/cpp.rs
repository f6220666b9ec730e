//! C++ Code Emitter
//!
//! Emits a header with one namespace per definition:
//!
//! ```text
//! namespace ebu_list::definitions::exchanges::preprocessor_status
//! {
//!     constexpr auto info = bisect::bimo::mq::exchange_info{...};
//!     namespace keys { ... }
//!     namespace announce::stream_status { ... }
//! }
//! ```
//!
//! `exchange_info` takes the flags in manifest order: durable, auto_delete,
//! internal.

use super::{quote, vocabularies_by_key, RenderProfile};
use crate::manifest::{ExchangeDefinition, Literal};

pub fn emit(definition: &ExchangeDefinition, profile: &RenderProfile) -> String {
    let info = &definition.exchange;
    let namespace = qualified_namespace(definition);
    let mut out = String::new();

    out.push_str("#pragma once\n\n");
    out.push_str(&format!("#include {}\n\n", quote(&profile.cpp_include)));

    out.push_str(&format!("namespace {}\n{{\n", namespace));
    out.push_str("    constexpr auto info =\n");
    out.push_str(&format!(
        "        {}{{{}, {}, {}, {}, {}}};\n",
        profile.cpp_exchange_info,
        quote(&info.name),
        quote(info.kind.as_str()),
        info.durable,
        info.auto_delete,
        info.internal
    ));

    emit_namespace(&mut out, "keys", &definition.keys);

    for (key, vocabularies) in vocabularies_by_key(definition) {
        for vocabulary in vocabularies {
            let name = format!("{}::{}", key.ident, vocabulary.name);
            emit_namespace(&mut out, &name, &vocabulary.literals);
        }
    }

    out.push_str(&format!("\n}} // namespace {}\n", namespace));
    out
}

fn qualified_namespace(definition: &ExchangeDefinition) -> String {
    definition
        .namespace
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(definition.id.as_str()))
        .collect::<Vec<_>>()
        .join("::")
}

fn emit_namespace(out: &mut String, name: &str, literals: &[Literal]) {
    let width = literals.iter().map(|l| l.ident.len()).max().unwrap_or(0);

    out.push_str(&format!("\n    namespace {}\n    {{\n", name));
    for literal in literals {
        out.push_str(&format!(
            "        constexpr auto {:<width$} = {};\n",
            literal.ident,
            quote(&literal.value),
            width = width
        ));
    }
    out.push_str(&format!("    }} // namespace {}\n", name));
}
