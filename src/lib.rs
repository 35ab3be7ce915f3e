//! Generate Swift `Codable` models from sample JSON.
//!
//! ```
//! use codable_gen::{Generator, GeneratorConfig};
//!
//! let generator = Generator::new(GeneratorConfig { header: None, ..Default::default() });
//! let out = generator.generate_str(r#"{"id": 1, "name": "Bob"}"#, "User").unwrap();
//! assert!(out.source.contains("struct User: Codable {"));
//! assert!(out.source.contains("let id: Int?"));
//! ```
//!
//! Pipeline: [`inference`] walks the JSON into [`ir`] `TypeDef`s, [`codegen`]
//! renders them, [`generator`] ties the two together per call.
pub mod codegen;
pub mod config;
pub mod error;
pub mod generator;
pub mod inference;
pub mod ir;
pub mod naming;
pub mod path_de;

pub use config::{EmptyArrayPolicy, GeneratorConfig, HeaderConfig, UrlMode};
pub use error::GenerateError;
pub use generator::{CancelToken, Generation, Generator};
pub use ir::{FieldDef, RootShape, Schema, TypeDef, TypeRegistry, Warning};
