//! Rust Code Emitter
//!
//! Emits a module body meant to be included as `pub mod <id>;`:
//! `INFO`, a `keys` module, and one nested module per vocabulary under the
//! routing key it belongs to. Every literal module also carries `ALL`.

use super::names::{to_pascal_case, to_screaming_snake_case};
use super::{quote, vocabularies_by_key, RenderProfile};
use crate::manifest::{ExchangeDefinition, Literal};

pub fn emit(definition: &ExchangeDefinition, profile: &RenderProfile) -> String {
    let info = &definition.exchange;
    let mut out = String::new();

    out.push_str(&format!(
        "use {}::{{ExchangeInfo, ExchangeKind}};\n\n",
        profile.rust_crate_path
    ));

    out.push_str("pub const INFO: ExchangeInfo = ExchangeInfo::new(\n");
    out.push_str(&format!("    {},\n", quote(&info.name)));
    out.push_str(&format!("    ExchangeKind::{},\n", to_pascal_case(info.kind.as_str())));
    out.push_str(&format!("    {},\n", info.durable));
    out.push_str(&format!("    {},\n", info.auto_delete));
    out.push_str(&format!("    {},\n", info.internal));
    out.push_str(");\n");

    out.push_str("\npub mod keys {\n");
    emit_constants(&mut out, &definition.keys, 1);
    out.push_str("}\n");

    for (key, vocabularies) in vocabularies_by_key(definition) {
        out.push_str(&format!("\npub mod {} {{\n", key.ident));
        for (i, vocabulary) in vocabularies.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("    pub mod {} {{\n", vocabulary.name));
            emit_constants(&mut out, &vocabulary.literals, 2);
            out.push_str("    }\n");
        }
        out.push_str("}\n");
    }

    out
}

fn emit_constants(out: &mut String, literals: &[Literal], depth: usize) {
    let indent = "    ".repeat(depth);
    let names: Vec<String> = literals
        .iter()
        .map(|l| to_screaming_snake_case(&l.ident))
        .collect();

    for (name, literal) in names.iter().zip(literals) {
        out.push_str(&format!("{}pub const {}: &str = {};\n", indent, name, quote(&literal.value)));
    }
    out.push('\n');
    out.push_str(&format!("{}pub const ALL: &[&str] = &[{}];\n", indent, names.join(", ")));
}
