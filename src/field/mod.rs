//! Structured JSON field
//!
//! A structured attribute of a record, stored as JSON text in one column and
//! exposed as a validated Rust value. The host drives it through a small set
//! of hooks:
//!
//! - pre-save: [`JsonField::to_storage`] / [`FieldSlot::prepare`]
//! - post-load: [`JsonField::from_storage`]
//! - attribute access: [`FieldSlot::get`] / [`FieldSlot::set`]
//! - migrations: [`JsonField::deconstruct`] / [`JsonField::reconstruct`]
//!
//! # Usage
//!
//! ```ignore
//! let field = JsonField::<ProductDefinition>::new();
//! let stored = field.to_storage(json!({ "name": "Watch", "price": 9.99 }))?;
//! let product = field.from_storage(stored.as_deref())?;
//! ```

mod codec;
mod coercer;
mod deconstruct;
mod errors;
mod model;
mod slot;
mod value;

pub use codec::{
    encode_value, CodecRegistry, Decoder, Encoder, EncoderOptions, ModelDecoder, ModelEncoder,
    DEFAULT_DECODER, DEFAULT_ENCODER,
};
pub use coercer::JsonField;
pub use deconstruct::FieldDeconstruction;
pub use errors::{FieldError, FieldErrorCode, FieldResult};
pub use model::{Model, ValidationContext};
pub use slot::FieldSlot;
pub use value::RawValue;
