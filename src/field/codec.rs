//! Encoder and decoder strategies.
//!
//! A field serializes instances through an [`Encoder`] and reads stored text
//! through a [`Decoder`]. Both are chosen per field and recorded by name when
//! the field is deconstructed, so a [`CodecRegistry`] can resolve them again.

use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::errors::{FieldError, FieldResult};
use super::model::{Model, ValidationContext};
use crate::schema::{FieldDef, FieldType, Schema};

pub const DEFAULT_ENCODER: &str = "ModelEncoder";
pub const DEFAULT_DECODER: &str = "ModelDecoder";

/// Turns a validated instance into stored JSON text.
pub trait Encoder<M: Model>: Send + Sync {
    /// Name recorded by deconstruction.
    fn name(&self) -> &str;

    fn encode(&self, value: &M) -> FieldResult<String>;
}

/// Turns stored JSON text into a validated instance.
pub trait Decoder<M: Model>: Send + Sync {
    /// Name recorded by deconstruction.
    fn name(&self) -> &str;

    fn decode(&self, text: &str, ctx: &ValidationContext<'_>) -> FieldResult<M>;
}

/// Output options for [`ModelEncoder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Pretty-print with this many spaces; compact when `None`
    pub indent: Option<usize>,
    /// Drop object keys whose value is `null`
    pub exclude_none: bool,
}

impl EncoderOptions {
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
            ..Self::default()
        }
    }

    pub fn exclude_none(mut self) -> Self {
        self.exclude_none = true;
        self
    }
}

/// Serializes a value of `schema` with the given options.
///
/// With `exclude_none`, a `null` member is dropped unless its field declares
/// a non-null default; dropping it there would read back as the default.
pub fn encode_value(
    value: &Value,
    options: &EncoderOptions,
    schema: &Schema,
) -> Result<String, serde_json::Error> {
    let stripped;
    let value = if options.exclude_none {
        stripped = match value {
            Value::Object(map) => strip_object(map, Some(&schema.fields)),
            other => strip_nulls(other, None),
        };
        &stripped
    } else {
        value
    };

    match options.indent {
        None => serde_json::to_string(value),
        Some(width) => {
            let indent = vec![b' '; width];
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
            value.serialize(&mut ser)?;
            String::from_utf8(buf).map_err(serde_json::Error::custom)
        }
    }
}

/// Removes droppable `null` object members at every depth. Array elements
/// are kept.
fn strip_nulls(value: &Value, field_type: Option<&FieldType>) -> Value {
    match value {
        Value::Object(map) => {
            let fields = match field_type {
                Some(FieldType::Object { fields, .. }) => Some(fields),
                _ => None,
            };
            strip_object(map, fields)
        }
        Value::Array(items) => {
            let element = match field_type {
                Some(FieldType::Array { element_type }) => Some(&element_type.field_type),
                _ => None,
            };
            Value::Array(items.iter().map(|v| strip_nulls(v, element)).collect())
        }
        other => other.clone(),
    }
}

fn strip_object(map: &Map<String, Value>, fields: Option<&BTreeMap<String, FieldDef>>) -> Value {
    Value::Object(
        map.iter()
            .filter_map(|(key, v)| {
                let def = fields.and_then(|f| f.get(key));
                if v.is_null() && !has_non_null_default(def) {
                    return None;
                }
                Some((key.clone(), strip_nulls(v, def.map(|d| &d.field_type))))
            })
            .collect(),
    )
}

fn has_non_null_default(def: Option<&FieldDef>) -> bool {
    def.and_then(|d| d.default.as_ref())
        .is_some_and(|default| !default.is_null())
}

/// Default encoder: serde serialization with configurable layout.
#[derive(Debug, Clone)]
pub struct ModelEncoder {
    name: String,
    options: EncoderOptions,
}

impl ModelEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self {
            name: DEFAULT_ENCODER.to_string(),
            options,
        }
    }

    /// Same encoder under another name, for fields that register their own.
    pub fn named(name: impl Into<String>, options: EncoderOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }
}

impl Default for ModelEncoder {
    fn default() -> Self {
        Self::new(EncoderOptions::default())
    }
}

impl<M: Model> Encoder<M> for ModelEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, value: &M) -> FieldResult<String> {
        let json = serde_json::to_value(value).map_err(|e| FieldError::serialization(M::NAME, e))?;
        encode_value(&json, &self.options, &M::schema())
            .map_err(|e| FieldError::serialization(M::NAME, e))
    }
}

/// Default decoder: parse, then validate against the field's schema.
#[derive(Debug, Clone, Default)]
pub struct ModelDecoder;

impl<M: Model> Decoder<M> for ModelDecoder {
    fn name(&self) -> &str {
        DEFAULT_DECODER
    }

    fn decode(&self, text: &str, ctx: &ValidationContext<'_>) -> FieldResult<M> {
        let value: Value = serde_json::from_str(text).map_err(|e| FieldError::malformed(M::NAME, e))?;
        ctx.build_value(&value)
    }
}

/// Named encoders and decoders for one model type.
pub struct CodecRegistry<M: Model> {
    encoders: BTreeMap<String, Arc<dyn Encoder<M>>>,
    decoders: BTreeMap<String, Arc<dyn Decoder<M>>>,
}

impl<M: Model> CodecRegistry<M> {
    /// Registry holding the default encoder and decoder.
    pub fn new() -> Self {
        let mut registry = Self {
            encoders: BTreeMap::new(),
            decoders: BTreeMap::new(),
        };
        registry.register_encoder(Arc::new(ModelEncoder::default()));
        registry.register_decoder(Arc::new(ModelDecoder));
        registry
    }

    /// Registers an encoder under its name, replacing any previous one.
    pub fn register_encoder(&mut self, encoder: Arc<dyn Encoder<M>>) -> &mut Self {
        self.encoders.insert(encoder.name().to_string(), encoder);
        self
    }

    /// Registers a decoder under its name, replacing any previous one.
    pub fn register_decoder(&mut self, decoder: Arc<dyn Decoder<M>>) -> &mut Self {
        self.decoders.insert(decoder.name().to_string(), decoder);
        self
    }

    pub fn encoder(&self, name: &str) -> Option<Arc<dyn Encoder<M>>> {
        self.encoders.get(name).cloned()
    }

    pub fn decoder(&self, name: &str) -> Option<Arc<dyn Decoder<M>>> {
        self.decoders.get(name).cloned()
    }
}

impl<M: Model> Default for CodecRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> fmt::Debug for CodecRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("encoders", &self.encoders.keys().collect::<Vec<_>>())
            .field("decoders", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}
