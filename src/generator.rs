//! Entry point: JSON in, Swift source out.
//!
//! A [`Generator`] holds only settings. Every call builds its own registry,
//! so one generator can serve any number of concurrent calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::codegen::{Codegen, Preamble};
use crate::config::{GeneratorConfig, UrlMode};
use crate::error::{GenerateError, Result, kind_name};
use crate::inference::{NeverUrl, SchemaInferencer, SyntacticUrlClassifier, UrlClassifier};
use crate::ir::{RootShape, TypeRegistry, Warning};
use crate::naming::ModelNames;

/// Cooperative cancellation, checked between field classifications.
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Output of one successful call.
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub source: String,
    /// The emitted root type; differs from the requested name only when the
    /// request was empty or clashed with a reserved name.
    pub root_name: String,
    pub root_shape: RootShape,
    pub warnings: Vec<Warning>,
}

pub struct Generator {
    config: GeneratorConfig,
    classifier: Arc<dyn UrlClassifier>,
    cancel: Option<CancelToken>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator {
    /// Classifier follows `config.url_mode`. [`UrlMode::Probe`] without the
    /// `probe` feature falls back to the syntactic check.
    pub fn new(config: GeneratorConfig) -> Self {
        let classifier = classifier_for(&config);
        Self { config, classifier, cancel: None }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn UrlClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parse `json` and generate. Malformed text is [`GenerateError::Parse`].
    pub fn generate_str(&self, json: &str, model_name: &str) -> Result<Generation> {
        let value: Value = serde_json::from_str(json)?;
        self.generate(&value, model_name)
    }

    /// Objects are modelled directly; arrays of objects by their first
    /// element. Anything else is a [`GenerateError::Shape`].
    pub fn generate(&self, value: &Value, model_name: &str) -> Result<Generation> {
        let (object, shape) = root_object(value)?;
        let (registry, names) = self.infer(object, model_name)?;

        let mut cg = Codegen::new();
        cg.emit_preamble(&Preamble {
            header: self.config.header.as_ref(),
            root: &names,
            shape,
        });
        cg.emit(&registry);

        tracing::debug!(types = registry.len(), warnings = registry.warnings().len(), "generated");
        Ok(Generation {
            source: cg.into_string(),
            root_name: names.type_name,
            root_shape: shape,
            warnings: registry.into_warnings(),
        })
    }

    /// Inference only: the registry that [`Generator::generate`] would render.
    pub fn schema(&self, value: &Value, model_name: &str) -> Result<TypeRegistry> {
        let (object, _) = root_object(value)?;
        self.infer(object, model_name).map(|(registry, _)| registry)
    }

    fn infer(&self, object: &Map<String, Value>, model_name: &str) -> Result<(TypeRegistry, ModelNames)> {
        let requested = ModelNames::new(model_name);
        let span = tracing::debug_span!("generate", model = %requested.type_name);
        let _guard = span.enter();

        let mut registry = TypeRegistry::new();
        let root = SchemaInferencer::new(self.classifier.as_ref())
            .with_empty_arrays(self.config.empty_arrays)
            .with_cancel(self.cancel.as_ref())
            .infer(object, &requested.type_name, &mut registry)?;
        let names = if root.name == requested.type_name {
            requested
        } else {
            ModelNames::from_type_name(root.name)
        };
        Ok((registry, names))
    }
}

/// The object to model and how it was found.
fn root_object(value: &Value) -> Result<(&Map<String, Value>, RootShape)> {
    match value {
        Value::Object(map) => Ok((map, RootShape::Object)),
        Value::Array(items) => {
            if let Some(bad) = items.iter().find(|v| !v.is_object()) {
                return Err(GenerateError::Shape { found: array_of(bad) });
            }
            match items.first() {
                Some(Value::Object(map)) => Ok((map, RootShape::ArrayOfObjects)),
                Some(other) => Err(GenerateError::Shape { found: array_of(other) }),
                None => Err(GenerateError::EmptyArray),
            }
        }
        other => Err(GenerateError::Shape { found: kind_name(other) }),
    }
}

fn array_of(element: &Value) -> &'static str {
    match element {
        Value::Null => "an array containing null",
        Value::Bool(_) => "an array containing a boolean",
        Value::Number(_) => "an array containing a number",
        Value::String(_) => "an array containing a string",
        Value::Array(_) => "an array containing an array",
        Value::Object(_) => "an array of objects",
    }
}

fn classifier_for(config: &GeneratorConfig) -> Arc<dyn UrlClassifier> {
    match config.url_mode {
        UrlMode::Syntactic => Arc::new(SyntacticUrlClassifier),
        UrlMode::Never => Arc::new(NeverUrl),
        UrlMode::Probe => probe_classifier(config),
    }
}

#[cfg(feature = "probe")]
fn probe_classifier(config: &GeneratorConfig) -> Arc<dyn UrlClassifier> {
    let timeout = std::time::Duration::from_millis(config.probe_timeout_ms);
    match crate::inference::ProbingUrlClassifier::new(timeout) {
        Ok(probe) => Arc::new(probe),
        Err(error) => {
            tracing::warn!(%error, "URL probe unavailable, using syntactic check");
            Arc::new(SyntacticUrlClassifier)
        }
    }
}

#[cfg(not(feature = "probe"))]
fn probe_classifier(_config: &GeneratorConfig) -> Arc<dyn UrlClassifier> {
    tracing::warn!("built without the `probe` feature, using syntactic URL check");
    Arc::new(SyntacticUrlClassifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generator() -> Generator {
        Generator::new(GeneratorConfig { header: None, ..GeneratorConfig::default() })
    }

    #[test]
    fn scalars_at_top_level_are_shape_errors() {
        let err = generator().generate(&json!("hello"), "T").unwrap_err();
        assert!(matches!(err, GenerateError::Shape { found: "a string" }));
        let err = generator().generate(&json!([1, 2]), "T").unwrap_err();
        assert!(matches!(err, GenerateError::Shape { found: "an array containing a number" }));
        let err = generator().generate(&json!([{"a": 1}, 2]), "T").unwrap_err();
        assert!(matches!(err, GenerateError::Shape { .. }));
    }

    #[test]
    fn empty_top_level_array_is_its_own_error() {
        let err = generator().generate(&json!([]), "T").unwrap_err();
        assert!(matches!(err, GenerateError::EmptyArray));
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = generator().generate_str("{", "T").unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }

    #[test]
    fn reserved_root_name_is_reported_back() {
        let generation = generator().generate(&json!({"a": 1}), "String").unwrap();
        assert_eq!(generation.root_name, "StringModel");
        assert!(generation.source.contains("struct StringModel: Codable {"));
        assert!(generation.source.contains("let stringModel = try?"));
    }

    #[test]
    fn cancelled_token_stops_generation() {
        let token = CancelToken::new();
        let generator = generator().with_cancel_token(token.clone());
        assert!(generator.generate(&json!({"a": 1}), "T").is_ok());
        token.cancel();
        let err = generator.generate(&json!({"a": 1}), "T").unwrap_err();
        assert!(matches!(err, GenerateError::Cancelled));
    }

    #[test]
    fn injected_classifier_wins_over_config() {
        let generator = generator().with_classifier(Arc::new(NeverUrl));
        let generation = generator.generate(&json!({"home": "https://example.com"}), "T").unwrap();
        assert!(generation.source.contains("let home: String?"));
    }

    #[test]
    fn schema_exposes_the_registry() {
        let registry = generator().schema(&json!([{"geo": {"lat": 1.5}}]), "Place").unwrap();
        let names: Vec<_> = registry.discovery_order().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Place", "Geo"]);
    }

    #[test]
    fn generator_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Generator>();
    }
}
