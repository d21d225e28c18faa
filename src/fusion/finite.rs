//! Rejects documents holding NaN or infinite floats.
//!
//! `serde_json` writes non-finite floats as `null`, which would give
//! `{"x": NaN}`, `{"x": inf}` and `{"x": null}` the same canonical key. This
//! serializer walks a document without producing output and fails on the
//! first non-finite float, including floats used as map keys.

use serde::Serialize;
use serde::ser::{self, Error as _};

pub(super) fn ensure_finite_floats<T: Serialize + ?Sized>(
    document: &T,
) -> Result<(), serde_json::Error> {
    document.serialize(FiniteFloats)
}

struct FiniteFloats;

type Walk = Result<(), serde_json::Error>;

fn check_float(value: f64) -> Walk {
    if value.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!(
            "non-finite float {value} has no canonical form"
        )))
    }
}

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Walk {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Walk {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Walk {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Walk {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Walk {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Walk {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Walk {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Walk {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Walk {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Walk {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Walk {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Walk {
        check_float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Walk {
        check_float(v)
    }

    fn serialize_char(self, _v: char) -> Walk {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Walk {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Walk {
        Ok(())
    }

    fn serialize_none(self) -> Walk {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Walk {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Walk {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Walk {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Walk {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Walk {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Walk {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, serde_json::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Walk {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _key: &'static str, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _key: &'static str, value: &T) -> Walk {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    enum Reading {
        Level(f32),
        Span { low: f64, high: f64 },
    }

    #[test]
    fn finite_values_pass() {
        assert!(ensure_finite_floats(&json!({"x": 1.5, "tags": ["a", null, 3]})).is_ok());
        assert!(ensure_finite_floats(&vec![Some(0.0_f64), None, Some(-2.25)]).is_ok());
        assert!(ensure_finite_floats(&Reading::Span { low: 0.1, high: 0.9 }).is_ok());
    }

    #[test]
    fn nested_non_finite_floats_fail() {
        assert!(ensure_finite_floats(&vec![vec![1.0_f64, f64::NAN]]).is_err());
        assert!(ensure_finite_floats(&Some(f64::NEG_INFINITY)).is_err());
        assert!(ensure_finite_floats(&Reading::Level(f32::INFINITY)).is_err());
        assert!(
            ensure_finite_floats(&Reading::Span {
                low: 0.0,
                high: f64::NAN
            })
            .is_err()
        );

        let mut labelled = BTreeMap::new();
        labelled.insert("score", (1_u8, f64::INFINITY));
        assert!(ensure_finite_floats(&labelled).is_err());
    }

    #[test]
    fn error_message_names_the_value() {
        let err = ensure_finite_floats(&f64::NAN).expect_err("NaN is not canonical");
        assert!(err.to_string().contains("non-finite float NaN"));
    }
}
