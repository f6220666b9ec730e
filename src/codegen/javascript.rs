//! JavaScript Code Emitter
//!
//! Emits a CommonJS module exporting one frozen object per definition, with
//! camelCase property names.

use super::names::to_camel_case;
use super::{quote, vocabularies_by_key};
use crate::manifest::{ExchangeDefinition, Literal};

pub fn emit(definition: &ExchangeDefinition) -> String {
    let info = &definition.exchange;
    let root = to_camel_case(&definition.id);
    let mut out = String::new();

    out.push_str(&format!("const {} = {{\n", root));

    out.push_str("    info: {\n");
    out.push_str(&format!("        name: {},\n", quote(&info.name)));
    out.push_str(&format!("        kind: {},\n", quote(info.kind.as_str())));
    out.push_str(&format!("        durable: {},\n", info.durable));
    out.push_str(&format!("        autoDelete: {},\n", info.auto_delete));
    out.push_str(&format!("        internal: {},\n", info.internal));
    out.push_str("    },\n");

    out.push_str("    keys: {\n");
    emit_properties(&mut out, &definition.keys, 2);
    out.push_str("    },\n");

    for (key, vocabularies) in vocabularies_by_key(definition) {
        out.push_str(&format!("    {}: {{\n", to_camel_case(&key.ident)));
        for vocabulary in vocabularies {
            out.push_str(&format!("        {}: {{\n", to_camel_case(&vocabulary.name)));
            emit_properties(&mut out, &vocabulary.literals, 3);
            out.push_str("        },\n");
        }
        out.push_str("    },\n");
    }

    out.push_str("};\n\n");
    out.push_str("const deepFreeze = (value) => {\n");
    out.push_str("    Object.values(value).forEach((child) => {\n");
    out.push_str("        if (typeof child === 'object') deepFreeze(child);\n");
    out.push_str("    });\n");
    out.push_str("    return Object.freeze(value);\n");
    out.push_str("};\n\n");
    out.push_str(&format!("module.exports = deepFreeze({});\n", root));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::tests::sample_definition;

    #[test]
    fn test_emit_object_layout() {
        let code = emit(&sample_definition());
        assert!(code.starts_with("const preprocessorStatus = {\n    info: {\n"));
        assert!(code.contains("        name: \"ebu-list.preprocessor.status\",\n        kind: \"fanout\",\n"));
        assert!(code.contains("        autoDelete: false,\n"));
        assert!(code.contains("    keys: {\n        announce: \"announce\",\n    },\n"));
        assert!(code.contains(
            "    announce: {\n        streamStatus: {\n            started: \"Started\",\n            stopped: \"Stopped\",\n            failed: \"Failed\",\n        },\n    },\n"
        ));
        assert!(code.ends_with("module.exports = deepFreeze(preprocessorStatus);\n"));
    }
}
