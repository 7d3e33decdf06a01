//! Per-record storage for a field value.
//!
//! A record keeps one [`FieldSlot`] per structured field. The slot may hold
//! a raw value (as assigned by a host constructor, or loaded lazily) until
//! first read; the first [`get`](FieldSlot::get) converts it and keeps the
//! instance, so later reads do no work. Assignments through
//! [`set`](FieldSlot::set) convert eagerly and leave the slot untouched on
//! failure.

use super::coercer::JsonField;
use super::errors::FieldResult;
use super::model::Model;
use super::value::RawValue;

/// Attribute storage for one field of one record.
#[derive(Debug, Clone)]
pub struct FieldSlot<M: Model> {
    /// Unconverted value, cleared once converted
    pending: Option<RawValue<M>>,
    value: Option<M>,
}

impl<M: Model> FieldSlot<M> {
    /// Empty slot, reads as `None`.
    pub fn empty() -> Self {
        Self {
            pending: None,
            value: None,
        }
    }

    /// Slot holding an unconverted value; converted on first read.
    pub fn from_raw(raw: impl Into<RawValue<M>>) -> Self {
        match raw.into() {
            RawValue::Null => Self::empty(),
            RawValue::Instance(value) => Self::from_instance(value),
            raw => Self {
                pending: Some(raw),
                value: None,
            },
        }
    }

    /// Slot holding a validated value.
    pub fn from_instance(value: M) -> Self {
        Self {
            pending: None,
            value: Some(value),
        }
    }

    /// Whether the slot holds its converted value.
    pub fn is_ready(&self) -> bool {
        self.pending.is_none()
    }

    /// Reads the value, converting and memoizing a raw value first.
    pub fn get(&mut self, field: &JsonField<M>) -> FieldResult<Option<&M>> {
        Ok(self.hydrate(field)?.as_ref())
    }

    /// Mutable access to the value. Changes are not validated until the
    /// next write.
    pub fn get_mut(&mut self, field: &JsonField<M>) -> FieldResult<Option<&mut M>> {
        Ok(self.hydrate(field)?.as_mut())
    }

    /// Assigns a value. Instances are stored as-is; anything else is
    /// converted first. On error the previous value is kept.
    pub fn set(&mut self, field: &JsonField<M>, value: impl Into<RawValue<M>>) -> FieldResult<()> {
        self.value = field.normalize_for_read(value.into())?;
        self.pending = None;
        Ok(())
    }

    /// Stored form of the current value, for the host's pre-save step.
    /// Does not memoize.
    pub fn prepare(&self, field: &JsonField<M>) -> FieldResult<Option<String>> {
        let converted;
        let value = match &self.pending {
            Some(raw) => {
                converted = field.read_raw(raw)?;
                converted.as_ref()
            }
            None => self.value.as_ref(),
        };
        value.map(|v| field.encode(v)).transpose()
    }

    /// Consumes the slot, returning the converted value.
    pub fn into_value(mut self, field: &JsonField<M>) -> FieldResult<Option<M>> {
        self.hydrate(field)?;
        Ok(self.value)
    }

    fn hydrate(&mut self, field: &JsonField<M>) -> FieldResult<&mut Option<M>> {
        if let Some(raw) = &self.pending {
            self.value = field.read_raw(raw)?;
            self.pending = None;
        }
        Ok(&mut self.value)
    }
}

impl<M: Model> Default for FieldSlot<M> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, Schema};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        qty: i64,
    }

    impl Model for Item {
        const NAME: &'static str = "Item";

        fn schema() -> Schema {
            Schema::new("Item")
                .field("name", FieldDef::required_string())
                .field("qty", FieldDef::required_int().with_default(json!(1)))
        }
    }

    #[test]
    fn test_lazy_conversion_memoized() {
        let field = JsonField::<Item>::new();
        let mut slot = FieldSlot::from_raw(json!({ "name": "Watch" }));
        assert!(!slot.is_ready());

        let item = slot.get(&field).unwrap().unwrap();
        assert_eq!(item.qty, 1);
        assert!(slot.is_ready());

        // a change through get_mut survives later reads, so no re-conversion
        slot.get_mut(&field).unwrap().unwrap().qty = 5;
        assert_eq!(slot.get(&field).unwrap().unwrap().qty, 5);
    }

    #[test]
    fn test_failed_lazy_read_keeps_raw() {
        let field = JsonField::<Item>::new();
        let mut slot = FieldSlot::from_raw(json!({ "qty": 2 }));

        assert!(slot.get(&field).is_err());
        assert!(!slot.is_ready());
        assert!(slot.get(&field).unwrap_err().mentions("name"));
    }

    #[test]
    fn test_set_converts_mapping() {
        let field = JsonField::<Item>::new();
        let mut slot = FieldSlot::empty();

        slot.set(&field, json!({ "name": "Watch", "qty": "3" })).unwrap();
        assert!(slot.is_ready());
        assert_eq!(slot.get(&field).unwrap().unwrap().qty, 3);
    }

    #[test]
    fn test_set_failure_keeps_previous() {
        let field = JsonField::<Item>::new();
        let mut slot = FieldSlot::from_instance(Item { name: "Watch".into(), qty: 1 });

        let err = slot.set(&field, json!({ "name": "Watch", "qty": "many" })).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(slot.get(&field).unwrap().unwrap().name, "Watch");
    }

    #[test]
    fn test_set_malformed_text() {
        let field = JsonField::<Item>::new();
        let mut slot = FieldSlot::empty();

        let err = slot.set(&field, "{not valid json").unwrap_err();
        assert_eq!(err.code().code(), "FIELD_MALFORMED_ENCODING");
        assert_eq!(slot.get(&field).unwrap(), None);
    }

    #[test]
    fn test_prepare_pending_and_ready() {
        let field = JsonField::<Item>::new();
        let pending = FieldSlot::from_raw(r#"{"name": "Watch"}"#);
        assert_eq!(
            pending.prepare(&field).unwrap().as_deref(),
            Some(r#"{"name":"Watch","qty":1}"#)
        );
        assert!(!pending.is_ready());

        let empty = FieldSlot::<Item>::empty();
        assert_eq!(empty.prepare(&field).unwrap(), None);
    }

    #[test]
    fn test_into_value() {
        let field = JsonField::<Item>::new();
        let slot = FieldSlot::from_raw(json!({ "name": "Watch" }));
        assert_eq!(
            slot.into_value(&field).unwrap(),
            Some(Item { name: "Watch".into(), qty: 1 })
        );
    }
}
