//! End-to-end: JSON text → Swift source.

use codable_gen::{
    EmptyArrayPolicy, GenerateError, Generator, GeneratorConfig, HeaderConfig, RootShape, Warning,
};
use pretty_assertions::assert_eq;

fn generator() -> Generator {
    Generator::new(GeneratorConfig { header: None, ..GeneratorConfig::default() })
}

/// `let` declarations of the struct called `name`, in order.
fn properties_of(source: &str, name: &str) -> Vec<String> {
    let start = source
        .find(&format!("struct {name}: Codable {{"))
        .unwrap_or_else(|| panic!("no struct {name} in:\n{source}"));
    source[start..]
        .lines()
        .skip(1)
        .take_while(|line| !line.trim_start().starts_with("enum CodingKeys") && *line != "}")
        .filter_map(|line| line.trim().strip_prefix("let ").map(str::to_string))
        .collect()
}

fn struct_order(source: &str) -> Vec<&str> {
    source
        .lines()
        .filter_map(|line| line.strip_prefix("struct "))
        .filter_map(|rest| rest.split(':').next())
        .collect()
}

#[test]
fn golden_nested_object() {
    let json = r#"{"scores": [1.5, 2], "id": 7, "flag": true, "address": {"city": "X"}}"#;
    let generation = generator().generate_str(json, "User").unwrap();
    assert_eq!(generation.source, include_str!("golden/user_with_address.swift"));
    assert_eq!(generation.root_name, "User");
    assert_eq!(generation.warnings.len(), 1);
}

#[test]
fn scenario_flat_object() {
    let generation = generator().generate_str(r#"{"id": 1, "name": "Bob"}"#, "User").unwrap();
    assert_eq!(properties_of(&generation.source, "User"), ["id: Int?", "name: String?"]);
    assert!(generation.source.contains("        case id = \"id\"\n        case name = \"name\"\n"));
}

#[test]
fn scenario_string_array() {
    let generation = generator().generate_str(r#"{"tags": ["a", "b"]}"#, "Post").unwrap();
    assert_eq!(properties_of(&generation.source, "Post"), ["tags: [String]?"]);
}

#[test]
fn scenario_top_level_array_uses_first_element() {
    let generation = generator().generate_str(r#"[{"id": 1}, {"id": 2}]"#, "Item").unwrap();
    assert_eq!(generation.root_shape, RootShape::ArrayOfObjects);
    assert_eq!(struct_order(&generation.source), ["Item"]);
    assert_eq!(properties_of(&generation.source, "Item"), ["id: Int?"]);
    assert!(generation.source.contains("JSONDecoder().decode([Item].self, from: jsonData)"));
}

#[test]
fn scenario_nested_type_precedes_parent() {
    let generation = generator().generate_str(r#"{"address": {"city": "X"}}"#, "User").unwrap();
    assert_eq!(struct_order(&generation.source), ["Address", "User"]);
    assert_eq!(properties_of(&generation.source, "Address"), ["city: String?"]);
    assert_eq!(properties_of(&generation.source, "User"), ["address: Address?"]);
}

#[test]
fn scenario_malformed_json_is_a_parse_error() {
    let err = generator().generate_str("{", "User").unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)));
}

#[test]
fn scenario_empty_array_does_not_abort() {
    let generation = generator().generate_str(r#"{"items": [], "id": 1}"#, "Bag").unwrap();
    assert_eq!(properties_of(&generation.source, "Bag"), ["id: Int?"]);
    assert!(matches!(generation.warnings.as_slice(), [Warning::FieldSkipped { key, .. }] if key == "items"));

    let generator = Generator::new(GeneratorConfig {
        header: None,
        empty_arrays: EmptyArrayPolicy::StringArray,
        ..GeneratorConfig::default()
    });
    let generation = generator.generate_str(r#"{"items": []}"#, "Bag").unwrap();
    assert_eq!(properties_of(&generation.source, "Bag"), ["items: [String]?"]);
}

#[test]
fn deep_nesting_orders_children_first() {
    let json = r#"{
        "b": {"c": {"d": 1}},
        "a": [{"e": {"f": "x"}}]
    }"#;
    let generation = generator().generate_str(json, "Root").unwrap();
    // discovery: Root, A, E, B, C
    assert_eq!(struct_order(&generation.source), ["C", "B", "E", "A", "Root"]);
    assert_eq!(properties_of(&generation.source, "Root"), ["a: [A]?", "b: B?"]);
}

#[test]
fn output_is_deterministic() {
    let json = r#"{"z": 1, "a": {"q": [1.25], "p": "https://example.com"}, "m": [{"k": "v"}]}"#;
    let generator = generator();
    let first = generator.generate_str(json, "Model").unwrap();
    let second = generator.generate_str(json, "Model").unwrap();
    assert_eq!(first.source, second.source);
}

#[test]
fn key_order_does_not_matter() {
    let a = generator().generate_str(r#"{"b": 1, "a": "x", "c": 2.5}"#, "T").unwrap();
    let b = generator().generate_str(r#"{"c": 2.5, "a": "x", "b": 1}"#, "T").unwrap();
    assert_eq!(a.source, b.source);
    assert_eq!(properties_of(&a.source, "T"), ["a: String?", "b: Int?", "c: Decimal?"]);
}

#[test]
fn field_count_matches_supported_keys() {
    let json = r#"{"a": 1, "b": true, "c": null, "d": "s", "e": [], "f": [[1]], "g": {"x": 1}, "h": [0.5]}"#;
    let generation = generator().generate_str(json, "T").unwrap();
    assert_eq!(properties_of(&generation.source, "T").len(), 4);
    assert_eq!(generation.warnings.len(), 4);
}

#[test]
fn fractional_numbers_are_always_decimal() {
    let json = r#"{"price": 9.99, "count": 3, "ratio": 1e-3, "whole": 4.0, "big": 123456789012345678901234567890}"#;
    let generation = generator().generate_str(json, "T").unwrap();
    assert_eq!(
        properties_of(&generation.source, "T"),
        ["big: Int?", "count: Int?", "price: Decimal?", "ratio: Decimal?", "whole: Int?"]
    );
}

#[test]
fn empty_model_name_defaults() {
    let generation = generator().generate_str(r#"{"id": 1}"#, "").unwrap();
    assert_eq!(generation.root_name, "ModelName");
    assert!(generation.source.contains("struct ModelName: Codable {"));
    assert!(generation.source.contains("//  let modelName = try? JSONDecoder().decode(ModelName.self, from: jsonData)"));
    assert!(generation.source.contains("//  let jsonData = try? JSONEncoder().encode(modelName)"));
}

#[test]
fn header_is_configurable() {
    let generator = Generator::new(GeneratorConfig {
        header: Some(HeaderConfig { app_name: "Shop".into(), author: "Ada".into(), year: 2019 }),
        ..GeneratorConfig::default()
    });
    let generation = generator.generate_str(r#"{"id": 1}"#, "Order Line").unwrap();
    assert!(generation.source.starts_with("//\n//  OrderLine.swift\n//  Shop\n//\n//  Created by Ada\n"));
    assert!(generation.source.contains("Copyright © 2019 Ada. All rights reserved."));
    assert!(generation.source.contains("\nimport Foundation\n\nstruct OrderLine: Codable {"));
}

#[test]
fn urls_are_typed_and_exported_as_strings() {
    let json = r#"{"avatar": "https://example.com/a.png", "links": ["http://a.example/x"], "bio": "hi"}"#;
    let generation = generator().generate_str(json, "Profile").unwrap();
    assert_eq!(
        properties_of(&generation.source, "Profile"),
        ["avatar: URL?", "bio: String?", "links: [URL]?"]
    );
    assert!(generation.source.contains("dictionary[keys.avatar.rawValue] = value.absoluteString"));
    assert!(generation.source.contains("dictionary[keys.links.rawValue] = value.map { $0.absoluteString }"));
}

#[test]
fn concurrent_calls_do_not_interfere() {
    let generator = generator();
    let inputs: Vec<String> = (0..16).map(|i| format!(r#"{{"field_{i}": {{"inner": {i}}}}}"#)).collect();
    let expected: Vec<String> = inputs
        .iter()
        .map(|json| generator.generate_str(json, "T").unwrap().source)
        .collect();
    let shared = &generator;
    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|json| scope.spawn(move || shared.generate_str(json, "T").unwrap().source))
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), want);
        }
    });
}

#[test]
fn keys_named_like_generated_members_are_renamed() {
    let generation = generator().generate_str(r#"{"to_dictionary": "x", "init": 1}"#, "T").unwrap();
    assert_eq!(
        properties_of(&generation.source, "T"),
        ["initValue: Int?", "toDictionaryValue: String?"]
    );
    assert!(generation.source.contains("case toDictionaryValue = \"to_dictionary\""));
}
