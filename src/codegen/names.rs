//! Identifier casing
//!
//! Manifest identifiers are lowercase snake_case; every target language
//! derives its own spelling from them here so that two emitters never
//! disagree on how a literal is named.

/// `stream_status` -> `StreamStatus`
pub fn to_pascal_case(ident: &str) -> String {
    words(ident).map(capitalize).collect()
}

/// `stream_status` -> `streamStatus`
pub fn to_camel_case(ident: &str) -> String {
    let mut result = String::with_capacity(ident.len());
    for (i, word) in words(ident).enumerate() {
        if i == 0 {
            result.push_str(&word.to_ascii_lowercase());
        } else {
            result.push_str(&capitalize(word));
        }
    }
    result
}

/// `stream_status` -> `STREAM_STATUS`
pub fn to_screaming_snake_case(ident: &str) -> String {
    words(ident)
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn words(ident: &str) -> impl Iterator<Item = &str> {
    ident
        .split(|c: char| c == '_' || c == '-' || c == ' ')
        .filter(|w| !w.is_empty())
}

/// First letter upper, rest lower
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut result = first.to_ascii_uppercase().to_string();
            for c in chars {
                result.push(c.to_ascii_lowercase());
            }
            result
        }
    }
}
