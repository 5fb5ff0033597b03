//! WASM bindings for the validators.
//!
//! Inputs are plain JS objects/arrays; reports come back as plain objects
//! with error messages as strings.

use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::pipeline::{PipelineInput, Validator};

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

/// Decodes a JS value into a JSON value, reporting failures as strings.
fn decode(value: JsValue) -> Result<Value, JsValue> {
    from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid input: {}", e)))
}

/// JavaScript-friendly wrapper around [`Validator`].
///
/// # Example (JavaScript)
/// ```js
/// const validator = new JsValidator();
/// const report = validator.validatePipeline({ outline }, 12);
/// if (!report.valid) console.log(report.summary);
/// ```
#[wasm_bindgen]
pub struct JsValidator {
    inner: Validator,
}

#[wasm_bindgen]
impl JsValidator {
    /// Creates a validator with the default limits.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsValidator {
        JsValidator {
            inner: Validator::new(),
        }
    }

    /// Creates a validator from a (partial) limits object.
    #[wasm_bindgen(js_name = withLimits)]
    pub fn with_limits(limits: JsValue) -> Result<JsValidator, JsValue> {
        let limits = from_value(limits).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsValidator {
            inner: Validator::with_limits(limits),
        })
    }

    #[wasm_bindgen(js_name = validateContext)]
    pub fn validate_context(&self, context: JsValue) -> Result<JsValue, JsValue> {
        let report = self.inner.validate_context(&decode(context)?);
        Ok(to_js_value(&report)?)
    }

    #[wasm_bindgen(js_name = validateOutline)]
    pub fn validate_outline(
        &self,
        outline: JsValue,
        expected: Option<usize>,
    ) -> Result<JsValue, JsValue> {
        let report = self.inner.validate_outline(&decode(outline)?, expected);
        Ok(to_js_value(&report)?)
    }

    #[wasm_bindgen(js_name = validateScene)]
    pub fn validate_scene(&self, scene: JsValue, index: Option<usize>) -> Result<JsValue, JsValue> {
        let report = self.inner.validate_scene(&decode(scene)?, index);
        Ok(to_js_value(&report)?)
    }

    #[wasm_bindgen(js_name = validateResults)]
    pub fn validate_results(&self, results: JsValue) -> Result<JsValue, JsValue> {
        let report = self.inner.validate_results(&decode(results)?);
        Ok(to_js_value(&report)?)
    }

    /// Validates `{ context?, outline?, results? }`; absent keys are skipped.
    #[wasm_bindgen(js_name = validatePipeline)]
    pub fn validate_pipeline(
        &self,
        input: JsValue,
        expected_scenes: Option<usize>,
    ) -> Result<JsValue, JsValue> {
        let input: PipelineInput =
            from_value(input).map_err(|e| JsValue::from_str(&format!("Invalid input: {}", e)))?;
        let report = self.inner.validate_pipeline(&input, expected_scenes);
        Ok(to_js_value(&report)?)
    }
}

impl Default for JsValidator {
    fn default() -> Self {
        Self::new()
    }
}
