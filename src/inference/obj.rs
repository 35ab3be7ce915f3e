use serde_json::{Map, Value};

use super::{Inferred, NumC, Walk};
use crate::error::Result;
use crate::ir::{FieldDef, Schema, SkipReason, TypeDef};
use crate::naming::{self, NameScope};

impl Walk<'_> {
    /// Infer one object under an already-claimed `name`.
    pub(super) fn object(&mut self, map: &Map<String, Value>, name: String) -> Result<Inferred> {
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut properties = NameScope::new();
        let mut fields = Vec::with_capacity(entries.len());
        let mut nested = Vec::new();

        for (key, value) in entries {
            self.check_cancelled()?;
            let schema = self.field(&name, key, value, &mut nested)?;
            if !schema.is_supported() {
                continue;
            }
            fields.push(FieldDef {
                raw_key: key.clone(),
                property_name: properties.claim(&naming::property_name(key)),
                schema,
            });
        }

        tracing::debug!(type_name = %name, fields = fields.len(), nested = nested.len(), "inferred object");
        Ok(Inferred { root: TypeDef { name, fields }, nested })
    }

    /// Classify one field value. Types discovered underneath are appended to
    /// `nested`.
    pub(super) fn field(
        &mut self,
        owner: &str,
        key: &str,
        value: &Value,
        nested: &mut Vec<TypeDef>,
    ) -> Result<Schema> {
        let schema = match value {
            Value::Array(items) => self.array(owner, key, items, nested)?,
            Value::Object(map) => Schema::ObjectRef(self.child(key, map, nested)?),
            Value::Number(n) => NumC::of(n).schema(),
            Value::String(s) => self.settings.classifier.schema_for(s),
            Value::Bool(_) => {
                self.skip(owner, key, SkipReason::Bool);
                Schema::Unsupported
            }
            Value::Null => {
                self.skip(owner, key, SkipReason::Null);
                Schema::Unsupported
            }
        };
        Ok(schema)
    }

    /// Infer a nested object named after `key`; returns the claimed name.
    pub(super) fn child(
        &mut self,
        key: &str,
        map: &Map<String, Value>,
        nested: &mut Vec<TypeDef>,
    ) -> Result<String> {
        let name = self.names.claim_type(&naming::type_name(key));
        let inferred = self.object(map, name.clone())?;
        nested.extend(inferred.into_discovery_order());
        Ok(name)
    }
}
