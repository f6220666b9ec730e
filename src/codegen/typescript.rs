//! TypeScript Code Emitter
//!
//! Emits `as const` objects plus a union type per literal set, so that
//! TypeScript consumers get the closed set checked at compile time.

use super::names::{to_camel_case, to_pascal_case};
use super::{quote, vocabularies_by_key};
use crate::manifest::{ExchangeDefinition, Literal};

pub fn emit(definition: &ExchangeDefinition) -> String {
    let info = &definition.exchange;
    let mut out = String::new();

    out.push_str("export const info = {\n");
    out.push_str(&format!("    name: {},\n", quote(&info.name)));
    out.push_str(&format!("    kind: {},\n", quote(info.kind.as_str())));
    out.push_str(&format!("    durable: {},\n", info.durable));
    out.push_str(&format!("    autoDelete: {},\n", info.auto_delete));
    out.push_str(&format!("    internal: {},\n", info.internal));
    out.push_str("} as const;\n\n");

    out.push_str("export const keys = {\n");
    emit_properties(&mut out, &definition.keys, 1);
    out.push_str("} as const;\n\n");
    out.push_str("export type RoutingKey = (typeof keys)[keyof typeof keys];\n");

    let mut aliases = Vec::new();
    for (key, vocabularies) in vocabularies_by_key(definition) {
        let key_name = to_camel_case(&key.ident);
        out.push_str(&format!("\nexport const {} = {{\n", key_name));
        for vocabulary in &vocabularies {
            let vocabulary_name = to_camel_case(&vocabulary.name);
            out.push_str(&format!("    {}: {{\n", vocabulary_name));
            emit_properties(&mut out, &vocabulary.literals, 2);
            out.push_str("    },\n");

            let path = format!("{}.{}", key_name, vocabulary_name);
            aliases.push(format!(
                "export type {}{} = (typeof {})[keyof typeof {}];\n",
                to_pascal_case(&key.ident),
                to_pascal_case(&vocabulary.name),
                path,
                path
            ));
        }
        out.push_str("} as const;\n");
    }

    if !aliases.is_empty() {
        out.push('\n');
        for alias in aliases {
            out.push_str(&alias);
        }
    }

    out
}

fn emit_properties(out: &mut String, literals: &[Literal], depth: usize) {
    let indent = "    ".repeat(depth);
    for literal in literals {
        out.push_str(&format!(
            "{}{}: {},\n",
            indent,
            to_camel_case(&literal.ident),
            quote(&literal.value)
        ));
    }
}
