use serde_json::Value;

use super::{NumC, Walk};
use crate::config::EmptyArrayPolicy;
use crate::error::Result;
use crate::ir::{Schema, SkipReason, TypeDef};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind { Null, Bool, Num, Str, Arr, Obj }

fn kind_of(v: &Value) -> Kind {
    match v {
        Value::Null      => Kind::Null,
        Value::Bool(_)   => Kind::Bool,
        Value::Number(_) => Kind::Num,
        Value::String(_) => Kind::Str,
        Value::Array(_)  => Kind::Arr,
        Value::Object(_) => Kind::Obj,
    }
}

impl Walk<'_> {
    /// Element schema comes from the first element. The one exception is
    /// numbers: any fractional element makes the whole array `[Decimal]`.
    pub(super) fn array(
        &mut self,
        owner: &str,
        key: &str,
        items: &[Value],
        nested: &mut Vec<TypeDef>,
    ) -> Result<Schema> {
        let Some(first) = items.first() else {
            return Ok(match self.settings.empty_arrays {
                EmptyArrayPolicy::Skip => {
                    self.skip(owner, key, SkipReason::EmptyArray);
                    Schema::Unsupported
                }
                EmptyArrayPolicy::StringArray => Schema::array_of(Schema::String),
            });
        };

        let first_kind = kind_of(first);
        if items[1..].iter().any(|v| kind_of(v) != first_kind) {
            self.heterogeneous(owner, key);
        }

        let item = match first {
            Value::Object(map) => Schema::ObjectRef(self.child(key, map, nested)?),
            Value::Number(_) => {
                let fractional = items.iter().any(|v| match v {
                    Value::Number(n) => NumC::of(n) == NumC::Fractional,
                    _ => false,
                });
                if fractional { Schema::Decimal } else { Schema::Int }
            }
            Value::String(s) => self.settings.classifier.schema_for(s),
            Value::Bool(_) | Value::Null | Value::Array(_) => {
                self.skip(owner, key, SkipReason::UnsupportedArray);
                return Ok(Schema::Unsupported);
            }
        };
        Ok(Schema::array_of(item))
    }
}
