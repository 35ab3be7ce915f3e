//! Schema inference: JSON object → `TypeDef`s.
//!
//! One walk per generation call. Each object walk returns its own `TypeDef`
//! together with the nested `TypeDef`s it discovered (pre-order), and the
//! caller concatenates them; nothing is accumulated behind the caller's back.
//!
//! Policy:
//! - Field classification looks at the value's variant, arrays at their first
//!   element (homogeneous array assumption).
//! - A numeric array is `[Decimal]` as soon as any element is fractional.
//! - Bool, null and unusable arrays drop the field and leave a warning.
pub mod num;
pub mod str;
mod arr;
mod obj;

use serde_json::{Map, Value};

use crate::config::EmptyArrayPolicy;
use crate::error::{GenerateError, Result};
use crate::generator::CancelToken;
use crate::ir::{SkipReason, TypeDef, TypeRegistry, Warning};
use crate::naming::NameScope;

pub use num::NumC;
pub use str::{NeverUrl, SyntacticUrlClassifier, UrlClassifier};
#[cfg(feature = "probe")]
pub use str::ProbingUrlClassifier;

// ------------------------------ Front API --------------------------------- //

/// Stateless inference settings. Per-call state lives in the registry passed
/// to [`SchemaInferencer::infer`].
#[derive(Clone, Copy)]
pub struct SchemaInferencer<'a> {
    classifier: &'a dyn UrlClassifier,
    empty_arrays: EmptyArrayPolicy,
    cancel: Option<&'a CancelToken>,
}

/// One object's `TypeDef` plus everything discovered beneath it.
#[derive(Debug, Clone)]
pub struct Inferred {
    pub root: TypeDef,
    /// Discovery order: each nested type precedes its own children.
    pub nested: Vec<TypeDef>,
}

impl Inferred {
    pub fn into_discovery_order(self) -> impl Iterator<Item = TypeDef> {
        std::iter::once(self.root).chain(self.nested)
    }
}

impl<'a> SchemaInferencer<'a> {
    pub fn new(classifier: &'a dyn UrlClassifier) -> Self {
        Self { classifier, empty_arrays: EmptyArrayPolicy::default(), cancel: None }
    }

    pub fn with_empty_arrays(mut self, policy: EmptyArrayPolicy) -> Self {
        self.empty_arrays = policy;
        self
    }

    pub fn with_cancel(mut self, cancel: Option<&'a CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Infer `object` as a type called `name` (made unique against what the
    /// registry already holds), register it and every nested type, and
    /// return the root.
    pub fn infer(
        &self,
        object: &Map<String, Value>,
        name: &str,
        registry: &mut TypeRegistry,
    ) -> Result<TypeDef> {
        let mut names = NameScope::new();
        for taken in registry.names() {
            names.claim(taken);
        }
        let mut walk = Walk { settings: *self, names, warnings: Vec::new() };

        let root_name = walk.names.claim_type(name);
        let inferred = walk.object(object, root_name)?;

        for warning in walk.warnings {
            registry.warn(warning);
        }
        let root = inferred.root.clone();
        for def in inferred.into_discovery_order() {
            registry.register(def);
        }
        Ok(root)
    }
}

// ------------------------------ Walk state -------------------------------- //

/// Mutable state of one inference call.
struct Walk<'a> {
    settings: SchemaInferencer<'a>,
    /// Type names claimed so far in this call.
    names: NameScope,
    warnings: Vec<Warning>,
}

impl Walk<'_> {
    fn check_cancelled(&self) -> Result<()> {
        match self.settings.cancel {
            Some(token) if token.is_cancelled() => Err(GenerateError::Cancelled),
            _ => Ok(()),
        }
    }

    fn skip(&mut self, type_name: &str, key: &str, reason: SkipReason) {
        self.warnings.push(Warning::FieldSkipped {
            type_name: type_name.to_string(),
            key: key.to_string(),
            reason,
        });
    }

    fn heterogeneous(&mut self, type_name: &str, key: &str) {
        self.warnings.push(Warning::HeterogeneousArray {
            type_name: type_name.to_string(),
            key: key.to_string(),
        });
    }
}

// ------------------------------- Tests ------------------------------------ //
