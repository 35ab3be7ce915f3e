// Strongly-typed IR between inference and codegen. No serde_json::Value here.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum Schema {
    Int,
    /// Any number with a non-zero fractional part. Exact, never `Double`.
    Decimal,
    String,
    Url,
    ArrayOf(Box<Schema>),
    /// By generated type name.
    ObjectRef(String),
    /// Bool, null, empty or nested arrays. Never reaches a [`FieldDef`].
    Unsupported,
}

impl Schema {
    pub fn array_of(item: Schema) -> Self {
        Schema::ArrayOf(Box::new(item))
    }

    pub fn is_supported(&self) -> bool {
        match self {
            Schema::Unsupported => false,
            Schema::ArrayOf(item) => item.is_supported(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Original JSON key; the coding-key literal.
    pub raw_key: String,
    /// Unique within the owning type.
    pub property_name: String,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDef {
    pub name: String,
    /// Sorted by `raw_key`.
    pub fields: Vec<FieldDef>,
}

/// Field-level findings. Generation still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum Warning {
    FieldSkipped { type_name: String, key: String, reason: SkipReason },
    /// Typed from the first element; later elements disagree.
    HeterogeneousArray { type_name: String, key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Bool,
    Null,
    EmptyArray,
    UnsupportedArray,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::FieldSkipped { type_name, key, reason } => {
                let why = match reason {
                    SkipReason::Bool => "boolean values are not modelled",
                    SkipReason::Null => "null gives no type information",
                    SkipReason::EmptyArray => "empty array gives no element type",
                    SkipReason::UnsupportedArray => "array elements are not modelled",
                };
                write!(f, "{type_name}.{key}: field skipped ({why})")
            }
            Warning::HeterogeneousArray { type_name, key } => {
                write!(f, "{type_name}.{key}: mixed array, typed from its first element")
            }
        }
    }
}

/// What the top-level JSON value was. An array of objects is modelled by
/// its first element; no wrapper type is emitted for the array itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootShape {
    Object,
    ArrayOfObjects,
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

/// Types discovered by one generation call, in discovery order: a type comes
/// before the nested types found inside it.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDef>,
    warnings: Vec<Warning>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: TypeDef) {
        tracing::debug!(type_name = %def.name, fields = def.fields.len(), "registered type");
        self.types.insert(def.name.clone(), def);
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!("{warning}");
        self.warnings.push(warning);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn discovery_order(&self) -> impl DoubleEndedIterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Referenced types before the types that reference them.
    pub fn emission_order(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values().rev()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str) -> TypeDef {
        TypeDef { name: name.into(), fields: Vec::new() }
    }

    #[test]
    fn emission_is_reverse_discovery() {
        let mut reg = TypeRegistry::new();
        reg.register(def("Root"));
        reg.register(def("Address"));
        reg.register(def("Geo"));
        let names: Vec<_> = reg.emission_order().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Geo", "Address", "Root"]);
    }

    #[test]
    fn nested_array_support_follows_item() {
        assert!(Schema::array_of(Schema::Int).is_supported());
        assert!(!Schema::array_of(Schema::Unsupported).is_supported());
    }
}
