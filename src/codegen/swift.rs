//! Swift `Codable` structs.
//!
//! Every generated property is optional and every decode path is tolerant:
//! a missing or mistyped key leaves the property `nil`. Only a non-keyed
//! container at the top of `init(from decoder:)` can throw.

use super::{Preamble, Renderer};
use crate::ir::{FieldDef, RootShape, Schema, TypeDef};
use crate::naming::{coding_key_literal, declaration, string_literal};

const INDENT: &str = "    ";

#[derive(Debug, Default, Clone, Copy)]
pub struct SwiftRenderer;

impl Renderer for SwiftRenderer {
    fn file_extension(&self) -> &'static str {
        "swift"
    }

    fn preamble(&self, preamble: &Preamble<'_>) -> String {
        let root = declaration(&preamble.root.type_name);
        let var = declaration(&preamble.root.variable_name);
        let decoded = match preamble.shape {
            RootShape::Object => format!("{root}.self"),
            RootShape::ArrayOfObjects => format!("[{root}].self"),
        };

        let mut out = String::new();
        if let Some(header) = preamble.header {
            out.push_str("//\n");
            out.push_str(&format!("//  {}.swift\n", preamble.root.type_name));
            out.push_str(&format!("//  {}\n", header.app_name));
            out.push_str("//\n");
            out.push_str(&format!("//  Created by {}\n", header.author));
            out.push_str(&format!(
                "//  Copyright © {} {}. All rights reserved.\n",
                header.year, header.author
            ));
            out.push_str("//\n");
            out.push_str("\n\n");
        }
        out.push_str("//  Usage:\n");
        out.push_str("//\n");
        out.push_str(&format!(
            "//  let {var} = try? JSONDecoder().decode({decoded}, from: jsonData)\n"
        ));
        out.push_str(&format!("//  let jsonData = try? JSONEncoder().encode({var})\n\n"));
        out.push_str("import Foundation\n\n");
        out
    }

    fn render(&self, def: &TypeDef) -> String {
        render(def)
    }
}

/// One struct, closing brace included, no trailing newline.
pub fn render(def: &TypeDef) -> String {
    let mut out = format!("struct {}: Codable {{\n\n", declaration(&def.name));
    if def.fields.is_empty() {
        out.push_str(&empty_body());
    } else {
        out.push_str(&properties(&def.fields));
        out.push_str(&coding_keys(&def.fields));
        out.push_str(&dictionary_init(&def.fields));
        out.push_str(&decoder_init(&def.fields));
        out.push_str(&to_dictionary(&def.fields));
        out.push_str(&encoder(&def.fields));
    }
    out.push('}');
    out
}

/// `[Address]`, `URL`, ...
pub fn type_of(schema: &Schema) -> String {
    match schema {
        Schema::Int => "Int".to_string(),
        Schema::Decimal => "Decimal".to_string(),
        Schema::String => "String".to_string(),
        Schema::Url => "URL".to_string(),
        Schema::ArrayOf(item) => format!("[{}]", type_of(item)),
        Schema::ObjectRef(name) => name.clone(),
        // filtered out during inference
        Schema::Unsupported => "Never".to_string(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SECTIONS
// ————————————————————————————————————————————————————————————————————————————

fn properties(fields: &[FieldDef]) -> String {
    let mut out = String::new();
    for f in fields {
        out.push_str(&format!(
            "{INDENT}let {}: {}?\n",
            declaration(&f.property_name),
            type_of(&f.schema)
        ));
    }
    out
}

fn coding_keys(fields: &[FieldDef]) -> String {
    let mut out = format!("\n{INDENT}enum CodingKeys: String, CodingKey {{\n");
    for f in fields {
        out.push_str(&format!(
            "{INDENT}{INDENT}case {} = {}\n",
            declaration(&f.property_name),
            string_literal(coding_key_literal(&f.raw_key))
        ));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn dictionary_init(fields: &[FieldDef]) -> String {
    let mut out = format!("\n{INDENT}init(from dictionary: [String: Any]) {{\n");
    out.push_str(&format!("{INDENT}{INDENT}let keys = CodingKeys.self\n"));
    for f in fields {
        let lookup = format!("dictionary[keys.{}.rawValue]", f.property_name);
        out.push_str(&format!(
            "{INDENT}{INDENT}self.{} = {}\n",
            f.property_name,
            coerce(&f.schema, &lookup)
        ));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn decoder_init(fields: &[FieldDef]) -> String {
    let mut out = format!("\n{INDENT}init(from decoder: Decoder) throws {{\n");
    out.push_str(&format!(
        "{INDENT}{INDENT}let values = try decoder.container(keyedBy: CodingKeys.self)\n"
    ));
    for f in fields {
        out.push_str(&format!(
            "{INDENT}{INDENT}self.{name} = try? values.decodeIfPresent({ty}.self, forKey: .{name})\n",
            name = f.property_name,
            ty = type_of(&f.schema),
        ));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn to_dictionary(fields: &[FieldDef]) -> String {
    let mut out = format!("\n{INDENT}func toDictionary() -> [String: Any] {{\n");
    out.push_str(&format!("{INDENT}{INDENT}let keys = CodingKeys.self\n"));
    out.push_str(&format!("{INDENT}{INDENT}var dictionary = [String: Any]()\n"));
    for f in fields {
        out.push_str(&format!("{INDENT}{INDENT}if let value = self.{} {{\n", f.property_name));
        out.push_str(&format!(
            "{INDENT}{INDENT}{INDENT}dictionary[keys.{}.rawValue] = {}\n",
            f.property_name,
            export(&f.schema, "value")
        ));
        out.push_str(&format!("{INDENT}{INDENT}}}\n"));
    }
    out.push_str(&format!("{INDENT}{INDENT}return dictionary\n"));
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn encoder(fields: &[FieldDef]) -> String {
    let mut out = format!("\n{INDENT}func encode(to encoder: Encoder) throws {{\n");
    out.push_str(&format!(
        "{INDENT}{INDENT}var container = encoder.container(keyedBy: CodingKeys.self)\n"
    ));
    for f in fields {
        out.push_str(&format!(
            "{INDENT}{INDENT}try container.encodeIfPresent(self.{name}, forKey: .{name})\n",
            name = f.property_name,
        ));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

// Synthesized Codable covers a struct without stored properties.
fn empty_body() -> String {
    let mut out = format!("{INDENT}init() {{}}\n");
    out.push_str(&format!("\n{INDENT}init(from dictionary: [String: Any]) {{}}\n"));
    out.push_str(&format!("\n{INDENT}func toDictionary() -> [String: Any] {{\n"));
    out.push_str(&format!("{INDENT}{INDENT}return [:]\n"));
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

// ————————————————————————————————————————————————————————————————————————————
// EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

/// `Any?` lookup → optional property value. Never traps; array elements that
/// do not coerce are dropped.
fn coerce(schema: &Schema, lookup: &str) -> String {
    match schema {
        Schema::Int | Schema::String => format!("{lookup} as? {}", type_of(schema)),
        Schema::Decimal => format!("({lookup} as? NSNumber)?.decimalValue"),
        Schema::Url => format!("({lookup} as? String).flatMap {{ URL(string: $0) }}"),
        Schema::ObjectRef(name) => {
            format!("({lookup} as? [String: Any]).map {{ {name}(from: $0) }}")
        }
        Schema::ArrayOf(item) => format!("({lookup} as? [Any])?{}", coerce_elements(item)),
        Schema::Unsupported => "nil".to_string(),
    }
}

fn coerce_elements(item: &Schema) -> String {
    match item {
        Schema::Decimal => ".compactMap { ($0 as? NSNumber)?.decimalValue }".to_string(),
        Schema::Url => ".compactMap { $0 as? String }.compactMap { URL(string: $0) }".to_string(),
        Schema::ObjectRef(name) => {
            format!(".compactMap {{ $0 as? [String: Any] }}.map {{ {name}(from: $0) }}")
        }
        other => format!(".compactMap {{ $0 as? {} }}", type_of(other)),
    }
}

/// Property value → something `JSONSerialization` accepts.
fn export(schema: &Schema, expr: &str) -> String {
    match schema {
        Schema::Int | Schema::String | Schema::Unsupported => expr.to_string(),
        Schema::Decimal => format!("NSDecimalNumber(decimal: {expr})"),
        Schema::Url => format!("{expr}.absoluteString"),
        Schema::ObjectRef(_) => format!("{expr}.toDictionary()"),
        Schema::ArrayOf(item) => {
            let element = export(item, "$0");
            if element == "$0" {
                expr.to_string()
            } else {
                format!("{expr}.map {{ {element} }}")
            }
        }
    }
}
