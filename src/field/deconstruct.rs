//! Field deconstruction for migration replay.
//!
//! A migration records how a field was built so it can be rebuilt later
//! without the code that first built it. Codecs are recorded by name; model types
//! by their `Model::NAME`.

use serde::{Deserialize, Serialize};

use crate::config::FieldOptions;

/// Constructor arguments of a [`JsonField`](super::JsonField).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeconstruction {
    /// Model name
    pub model: String,
    /// Encoder name
    pub encoder: String,
    /// Decoder name
    pub decoder: String,
    /// Field options
    #[serde(default)]
    pub options: FieldOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{
        CodecRegistry, EncoderOptions, JsonField, Model, ModelEncoder, DEFAULT_DECODER,
        DEFAULT_ENCODER,
    };
    use crate::schema::{FieldDef, Schema};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        body: String,
    }

    impl Model for Note {
        const NAME: &'static str = "Note";

        fn schema() -> Schema {
            Schema::new("Note").field("body", FieldDef::required_string())
        }
    }

    #[test]
    fn test_default_field_deconstruction() {
        let desc = JsonField::<Note>::new().deconstruct();
        assert_eq!(desc.model, "Note");
        assert_eq!(desc.encoder, DEFAULT_ENCODER);
        assert_eq!(desc.decoder, DEFAULT_DECODER);
        assert_eq!(desc.options, FieldOptions::default());
    }

    #[test]
    fn test_deconstruction_json_shape() {
        let desc: FieldDeconstruction = serde_json::from_value(json!({
            "model": "Note",
            "encoder": "ModelEncoder",
            "decoder": "ModelDecoder"
        }))
        .unwrap();
        assert_eq!(desc.options, FieldOptions::default());
    }

    #[test]
    fn test_reconstruct_custom_encoder() {
        let pretty = Arc::new(ModelEncoder::named(
            "PrettyNoteEncoder",
            EncoderOptions::pretty(2).exclude_none(),
        ));
        let field = JsonField::<Note>::new().with_encoder(pretty.clone());
        let desc = field.deconstruct();
        assert_eq!(desc.encoder, "PrettyNoteEncoder");

        let mut registry = CodecRegistry::<Note>::new();
        registry.register_encoder(pretty);

        let rebuilt = JsonField::<Note>::reconstruct(&desc, &registry).unwrap();
        assert_eq!(rebuilt.deconstruct(), desc);

        let note = Note { body: "hi".into() };
        assert_eq!(rebuilt.encode(&note).unwrap(), field.encode(&note).unwrap());
    }

    #[test]
    fn test_reconstruct_unknown_encoder_fails() {
        let desc = FieldDeconstruction {
            model: "Note".into(),
            encoder: "Missing".into(),
            decoder: DEFAULT_DECODER.into(),
            options: FieldOptions::default(),
        };
        let err = JsonField::<Note>::reconstruct(&desc, &CodecRegistry::new()).unwrap_err();
        assert_eq!(err.code().code(), "FIELD_RECONSTRUCTION_FAILED");
    }

    #[test]
    fn test_reconstruct_wrong_model_fails() {
        let desc = FieldDeconstruction {
            model: "Product".into(),
            encoder: DEFAULT_ENCODER.into(),
            decoder: DEFAULT_DECODER.into(),
            options: FieldOptions::default(),
        };
        let err = JsonField::<Note>::reconstruct(&desc, &CodecRegistry::new()).unwrap_err();
        assert!(err.to_string().contains("Product"));
    }
}
