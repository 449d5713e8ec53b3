//! Conversion between records and stored documents.
//!
//! Records go through their JSON text form so that serde attributes on the
//! record (notably `#[serde(rename = "_id")]`) and human-readable encodings
//! (UUIDs as hyphenated strings) are what ends up in the database.
//!
//! JSON has no representation for NaN or infinities, so values holding a
//! non-finite float are rejected instead of being written as `null`.

use bson::{Bson, Document};
use serde::{Serialize, de::DeserializeOwned};

/// Convert `value` into a document. Fails when `value` does not serialize to a
/// JSON object or holds a non-finite float.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Document> {
    value.serialize(FiniteFloats)?;
    let text = serde_json::to_string(value)?;
    serde_json::from_str(&text)
}

/// Decode a stored document into `T`.
pub fn from_document<T: DeserializeOwned>(document: &Document) -> serde_json::Result<T> {
    let text = serde_json::to_string(document)?;
    serde_json::from_str(&text)
}

/// Convert a single value (e.g. an array element) into its stored representation.
pub fn to_bson<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Bson> {
    value.serialize(FiniteFloats)?;
    let text = serde_json::to_string(value)?;
    serde_json::from_str(&text)
}

/// Serializer that only walks a value, failing on the first NaN or infinity.
#[derive(Clone, Copy)]
struct FiniteFloats;

type CheckResult = serde_json::Result<()>;

fn non_finite(value: f64) -> serde_json::Error {
    serde::ser::Error::custom(format!("non-finite float `{value}` cannot be stored"))
}

fn in_field(key: &str, err: serde_json::Error) -> serde_json::Error {
    serde::ser::Error::custom(format!("field `{key}`: {err}"))
}

impl serde::Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> CheckResult {
        Ok(())
    }
    fn serialize_i8(self, _: i8) -> CheckResult {
        Ok(())
    }
    fn serialize_i16(self, _: i16) -> CheckResult {
        Ok(())
    }
    fn serialize_i32(self, _: i32) -> CheckResult {
        Ok(())
    }
    fn serialize_i64(self, _: i64) -> CheckResult {
        Ok(())
    }
    fn serialize_i128(self, _: i128) -> CheckResult {
        Ok(())
    }
    fn serialize_u8(self, _: u8) -> CheckResult {
        Ok(())
    }
    fn serialize_u16(self, _: u16) -> CheckResult {
        Ok(())
    }
    fn serialize_u32(self, _: u32) -> CheckResult {
        Ok(())
    }
    fn serialize_u64(self, _: u64) -> CheckResult {
        Ok(())
    }
    fn serialize_u128(self, _: u128) -> CheckResult {
        Ok(())
    }
    fn serialize_f32(self, value: f32) -> CheckResult {
        if value.is_finite() {
            Ok(())
        } else {
            Err(non_finite(f64::from(value)))
        }
    }
    fn serialize_f64(self, value: f64) -> CheckResult {
        if value.is_finite() {
            Ok(())
        } else {
            Err(non_finite(value))
        }
    }
    fn serialize_char(self, _: char) -> CheckResult {
        Ok(())
    }
    fn serialize_str(self, _: &str) -> CheckResult {
        Ok(())
    }
    fn serialize_bytes(self, _: &[u8]) -> CheckResult {
        Ok(())
    }
    fn serialize_none(self) -> CheckResult {
        Ok(())
    }
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> CheckResult {
        value.serialize(self)
    }
    fn serialize_unit(self) -> CheckResult {
        Ok(())
    }
    fn serialize_unit_struct(self, _: &'static str) -> CheckResult {
        Ok(())
    }
    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> CheckResult {
        Ok(())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(self).map_err(|err| in_field(variant, err))
    }
    fn serialize_seq(self, _: Option<usize>) -> serde_json::Result<Self> {
        Ok(self)
    }
    fn serialize_tuple(self, _: usize) -> serde_json::Result<Self> {
        Ok(self)
    }
    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> serde_json::Result<Self> {
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }
    fn serialize_map(self, _: Option<usize>) -> serde_json::Result<Self> {
        Ok(self)
    }
    fn serialize_struct(self, _: &'static str, _: usize) -> serde_json::Result<Self> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }
}

impl serde::ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(*self)
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(*self)
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(*self)
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(*self)
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> CheckResult {
        key.serialize(*self)
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> CheckResult {
        value.serialize(*self)
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(*self).map_err(|err| in_field(key, err))
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}

impl serde::ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> CheckResult {
        value.serialize(*self).map_err(|err| in_field(key, err))
    }
    fn end(self) -> CheckResult {
        Ok(())
    }
}
