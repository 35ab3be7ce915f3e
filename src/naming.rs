//! Raw JSON key → Swift identifiers.
//!
//! Everything here is a pure string transform. Word splitting follows the
//! Foundation `capitalized` rules the generated code is meant to match: each
//! word keeps its first character upper-cased and the rest lower-cased, so
//! `user_id` → `UserId` and `userID` → `Userid`.

use std::collections::HashMap;

pub const DEFAULT_MODEL_NAME: &str = "ModelName";

/// Fallback when a key has no identifier characters at all (`""`, `"-"`).
const EMPTY_KEY_NAME: &str = "Field";

/// Keywords that must be back-ticked when used as a declared identifier.
const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func",
    "import", "inout", "internal", "let", "open", "operator", "private",
    "precedencegroup", "protocol", "public", "rethrows", "static", "struct",
    "subscript", "typealias", "var", "break", "case", "catch", "continue", "default",
    "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat",
    "return", "throw", "switch", "where", "while", "as", "await", "false", "is",
    "nil", "super", "throws", "true", "try",
];

/// Property names that get a `Value` suffix: keywords that cannot follow `.`
/// even with SE-0071, plus members every generated struct already declares.
const MEMBER_HOSTILE: &[&str] = &["self", "init", "Self", "Type", "Protocol", "toDictionary"];

/// Type names the emitted code itself refers to; a generated struct with one
/// of these names would shadow it.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Any", "Array", "Bool", "Codable", "CodingKey", "CodingKeys", "Decimal",
    "Decoder", "Dictionary", "Encoder", "Int", "JSONDecoder", "JSONEncoder",
    "NSDecimalNumber", "NSNumber", "Optional", "Protocol", "Self", "String", "Type",
    "URL",
];

// ————————————————————————————————————————————————————————————————————————————
// KEY TRANSFORMS
// ————————————————————————————————————————————————————————————————————————————

/// `first_name` → `FirstName`.
pub fn type_name(raw_key: &str) -> String {
    let mut out = String::with_capacity(raw_key.len());
    for word in split_words(raw_key) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            for c in chars {
                out.extend(c.to_lowercase());
            }
        }
    }
    if out.is_empty() {
        return EMPTY_KEY_NAME.to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// `first_name` → `firstName`. Not escaped; see [`declaration`].
pub fn property_name(raw_key: &str) -> String {
    let name = lowercase_first(&type_name(raw_key));
    if MEMBER_HOSTILE.contains(&name.as_str()) {
        format!("{name}Value")
    } else {
        name
    }
}

/// The wire key. Identical to the raw key.
pub fn coding_key_literal(raw_key: &str) -> &str {
    raw_key
}

/// Identifier as written at its declaration site (`let`, `case`).
pub fn declaration(identifier: &str) -> String {
    if SWIFT_KEYWORDS.contains(&identifier) {
        format!("`{identifier}`")
    } else {
        identifier.to_string()
    }
}

/// Swift string literal body for `s`.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

// ————————————————————————————————————————————————————————————————————————————
// MODEL NAME
// ————————————————————————————————————————————————————————————————————————————

/// Root type name + example variable name derived from the user's model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNames {
    pub type_name: String,
    pub variable_name: String,
}

impl ModelNames {
    /// Spaces (and anything else that cannot appear in an identifier) are
    /// removed; casing is left alone. Empty input becomes `ModelName`.
    pub fn new(model_name: &str) -> Self {
        let mut type_name: String = model_name
            .chars()
            .filter(|c| is_identifier_char(*c))
            .collect();
        if type_name.is_empty() {
            type_name = DEFAULT_MODEL_NAME.to_string();
        }
        if type_name.starts_with(|c: char| c.is_ascii_digit()) {
            type_name.insert(0, '_');
        }
        Self::from_type_name(type_name)
    }

    pub fn from_type_name(type_name: String) -> Self {
        let variable_name = lowercase_first(&type_name);
        Self { type_name, variable_name }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// UNIQUENESS
// ————————————————————————————————————————————————————————————————————————————

/// Hands out identifiers that are unique within one scope. A repeated
/// candidate gets a numeric suffix starting at 2.
#[derive(Debug, Default, Clone)]
pub struct NameScope {
    taken: HashMap<String, u32>,
}

impl NameScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, candidate: &str) -> String {
        if !self.taken.contains_key(candidate) {
            self.taken.insert(candidate.to_string(), 1);
            return candidate.to_string();
        }
        let mut n = self.taken[candidate];
        loop {
            n += 1;
            let next = format!("{candidate}{n}");
            if !self.taken.contains_key(&next) {
                self.taken.insert(candidate.to_string(), n);
                self.taken.insert(next.clone(), 1);
                return next;
            }
        }
    }

    /// Like [`NameScope::claim`] but steers clear of names the emitted code
    /// depends on (`String` → `StringModel`).
    pub fn claim_type(&mut self, candidate: &str) -> String {
        if is_reserved_type_name(candidate) {
            self.claim(&format!("{candidate}Model"))
        } else {
            self.claim(candidate)
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn is_identifier_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn split_words(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
