//! JSON column field holding a schema-validated value.
//!
//! A [`JsonField`] owns the conversion contract between three forms of the
//! same attribute:
//!
//! ```text
//!  mapping ──validate──▶ instance M ──encoder──▶ stored JSON text
//!                             ▲                         │
//!                             └────────decoder──────────┘
//! ```
//!
//! Reads always yield a validated `M` (or `None`), writes always go through a
//! validated `M` before serialization. An instance handed in is returned as
//! is, without being validated again.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::codec::{
    CodecRegistry, Decoder, Encoder, ModelDecoder, ModelEncoder, DEFAULT_DECODER, DEFAULT_ENCODER,
};
use super::deconstruct::FieldDeconstruction;
use super::errors::{FieldError, FieldResult};
use super::model::{Model, ValidationContext};
use super::value::RawValue;
use crate::config::FieldOptions;
use crate::schema::Schema;

/// A structured field of type `M`, stored as JSON text.
pub struct JsonField<M: Model> {
    schema: Schema,
    options: FieldOptions,
    encoder: Arc<dyn Encoder<M>>,
    decoder: Arc<dyn Decoder<M>>,
}

impl<M: Model> JsonField<M> {
    /// Field with default options, encoder and decoder.
    pub fn new() -> Self {
        Self::with_options(FieldOptions::default())
    }

    /// Field with the given options. The default encoder follows
    /// `options.encoder`.
    pub fn with_options(options: FieldOptions) -> Self {
        let encoder = Arc::new(ModelEncoder::new(options.encoder.clone()));
        Self {
            schema: M::schema(),
            options,
            encoder,
            decoder: Arc::new(ModelDecoder),
        }
    }

    /// Replaces the encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn Encoder<M>>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Replaces the decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn Decoder<M>>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn encoder(&self) -> &dyn Encoder<M> {
        self.encoder.as_ref()
    }

    pub fn decoder(&self) -> &dyn Decoder<M> {
        self.decoder.as_ref()
    }

    fn context(&self) -> ValidationContext<'_> {
        ValidationContext::new(&self.schema, self.options.mode, self.options.extra)
    }

    /// Normalizes any accepted input to a validated instance.
    ///
    /// # Errors
    ///
    /// - `SchemaValidation` if a mapping or decoded text violates the schema
    /// - `MalformedEncoding` if text is not valid JSON
    pub fn normalize_for_read(&self, raw: RawValue<M>) -> FieldResult<Option<M>> {
        match raw {
            RawValue::Instance(value) => Ok(Some(value)),
            other => self.read_raw(&other),
        }
    }

    /// Normalizes any accepted input to stored JSON text.
    ///
    /// Mappings and text are validated first; nothing unvalidated is encoded.
    pub fn normalize_for_write(&self, raw: RawValue<M>) -> FieldResult<Option<String>> {
        match self.normalize_for_read(raw)? {
            Some(value) => self.encode(&value).map(Some),
            None => Ok(None),
        }
    }

    /// Pre-save hook: value about to be written to the column.
    pub fn to_storage(&self, value: impl Into<RawValue<M>>) -> FieldResult<Option<String>> {
        self.normalize_for_write(value.into())
    }

    /// Post-load hook: column text read back from the database.
    pub fn from_storage(&self, stored: Option<&str>) -> FieldResult<Option<M>> {
        stored.map(|text| self.decode(text)).transpose()
    }

    /// Generic conversion hook, used by hosts when cleaning or assigning.
    pub fn to_runtime(&self, value: impl Into<RawValue<M>>) -> FieldResult<Option<M>> {
        self.normalize_for_read(value.into())
    }

    /// Encodes a validated instance.
    pub fn encode(&self, value: &M) -> FieldResult<String> {
        self.encoder.encode(value)
    }

    /// Converts without consuming the input. Instances are cloned.
    pub(crate) fn read_raw(&self, raw: &RawValue<M>) -> FieldResult<Option<M>> {
        let result = match raw {
            RawValue::Null => return Ok(None),
            RawValue::Instance(value) => return Ok(Some(value.clone())),
            RawValue::Mapping(map) => self.context().build(map),
            RawValue::Json(text) => self.decode(text),
        };

        match &result {
            Ok(_) => debug!(model = M::NAME, input = raw.kind(), "normalized field value"),
            Err(e) => warn!(model = M::NAME, input = raw.kind(), error = %e, "rejected field value"),
        }
        result.map(Some)
    }

    fn decode(&self, text: &str) -> FieldResult<M> {
        self.decoder.decode(text, &self.context())
    }

    /// Constructor arguments needed to rebuild this field.
    pub fn deconstruct(&self) -> FieldDeconstruction {
        FieldDeconstruction {
            model: M::NAME.to_string(),
            encoder: self.encoder.name().to_string(),
            decoder: self.decoder.name().to_string(),
            options: self.options.clone(),
        }
    }

    /// Rebuilds a field from its deconstruction.
    ///
    /// The default codec names always resolve; any other name must be
    /// registered.
    pub fn reconstruct(
        desc: &FieldDeconstruction,
        registry: &CodecRegistry<M>,
    ) -> FieldResult<Self> {
        if desc.model != M::NAME {
            return Err(FieldError::reconstruction(format!(
                "deconstruction is for model '{}', not '{}'",
                desc.model,
                M::NAME
            )));
        }

        let mut field = Self::with_options(desc.options.clone());

        if desc.encoder != DEFAULT_ENCODER {
            let encoder = registry.encoder(&desc.encoder).ok_or_else(|| {
                FieldError::reconstruction(format!("unknown encoder '{}'", desc.encoder))
            })?;
            field = field.with_encoder(encoder);
        }
        if desc.decoder != DEFAULT_DECODER {
            let decoder = registry.decoder(&desc.decoder).ok_or_else(|| {
                FieldError::reconstruction(format!("unknown decoder '{}'", desc.decoder))
            })?;
            field = field.with_decoder(decoder);
        }

        Ok(field)
    }
}

impl<M: Model> Default for JsonField<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for JsonField<M> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            options: self.options.clone(),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<M: Model> fmt::Debug for JsonField<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonField")
            .field("model", &M::NAME)
            .field("options", &self.options)
            .field("encoder", &self.encoder.name())
            .field("decoder", &self.decoder.name())
            .finish()
    }
}
