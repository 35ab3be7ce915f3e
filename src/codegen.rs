//! TypeDefs → source text.
//!
//! A [`Renderer`] knows one target syntax; [`Codegen`] assembles a whole
//! output file from the preamble and every registered type.
pub mod swift;

use crate::config::HeaderConfig;
use crate::ir::{RootShape, TypeDef, TypeRegistry};
use crate::naming::ModelNames;

pub use swift::SwiftRenderer;

/// Everything the file preamble (header, usage comment, imports) needs.
#[derive(Debug, Clone, Copy)]
pub struct Preamble<'a> {
    pub header: Option<&'a HeaderConfig>,
    pub root: &'a ModelNames,
    pub shape: RootShape,
}

pub trait Renderer {
    /// Without the leading dot.
    fn file_extension(&self) -> &'static str;

    fn preamble(&self, preamble: &Preamble<'_>) -> String;

    /// A pure function of one type. Other types are referenced by name only.
    fn render(&self, def: &TypeDef) -> String;
}

pub struct Codegen<R> {
    renderer: R,
    out: String,
}

impl Codegen<SwiftRenderer> {
    pub fn new() -> Self {
        Self::with_renderer(SwiftRenderer)
    }
}

impl Default for Codegen<SwiftRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Renderer> Codegen<R> {
    pub fn with_renderer(renderer: R) -> Self {
        Self { renderer, out: String::new() }
    }

    pub fn emit_preamble(&mut self, preamble: &Preamble<'_>) {
        self.out.push_str(&self.renderer.preamble(preamble));
    }

    pub fn emit_type(&mut self, def: &TypeDef) {
        self.out.push_str(&self.renderer.render(def));
        self.out.push_str("\n\n");
    }

    /// All types, each one after the types it references.
    pub fn emit(&mut self, registry: &TypeRegistry) {
        for def in registry.emission_order() {
            self.emit_type(def);
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }
}
