//! Serde helpers for [`FlakeId`].
//!
//! With the `serde` feature, `FlakeId` (de)serializes as its native `u64`.
//! Consumers that cannot represent 64-bit integers exactly (JavaScript, many
//! JSON tools) can opt into the decimal string form with
//! `#[serde(with = "flurry::as_string")]`.
//!
//! [`FlakeId`]: crate::FlakeId

use core::fmt;

use serde::{Deserializer, Serializer, de};

pub mod as_string {
    use super::{Deserializer, Serializer, de, fmt};
    use crate::FlakeId;

    /// Serialize an ID as its decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &FlakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from its decimal string.
    ///
    /// Human-readable formats may also hand over a plain integer. Compact
    /// formats (bincode and friends) are not self-describing, so only the
    /// string written by [`serialize`] is asked for.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not a decimal `u64`.
    pub fn deserialize<'de, D>(d: D) -> Result<FlakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        if d.is_human_readable() {
            d.deserialize_any(FlakeIdVisitor)
        } else {
            d.deserialize_str(FlakeIdVisitor)
        }
    }

    struct FlakeIdVisitor;

    impl de::Visitor<'_> for FlakeIdVisitor {
        type Value = FlakeId;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal string or unsigned integer")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse::<u64>().map(FlakeId::from_raw).map_err(E::custom)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(FlakeId::from_raw(v))
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use serde::{Deserialize, Deserializer, Serialize, de};

    use crate::{FlakeId, OverflowMode};

    /// A compact, non-self-describing format holding one string.
    struct CompactStr<'a>(&'a str);

    impl<'de> Deserializer<'de> for CompactStr<'de> {
        type Error = de::value::Error;

        fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
        where
            V: de::Visitor<'de>,
        {
            Err(de::Error::custom("format is not self-describing"))
        }

        fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
        where
            V: de::Visitor<'de>,
        {
            visitor.visit_borrowed_str(self.0)
        }

        fn is_human_readable(&self) -> bool {
            false
        }

        serde::forward_to_deserialize_any! {
            bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char string
            bytes byte_buf option unit unit_struct newtype_struct seq tuple
            tuple_struct map struct enum identifier ignored_any
        }
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Event {
        id: FlakeId,
        #[serde(with = "crate::as_string")]
        parent: FlakeId,
    }

    #[test]
    fn native_and_string_forms() {
        let event = Event {
            id: FlakeId::from_raw(6_837_401_535_245_324_288),
            parent: FlakeId::from_components(50, 3, 2, 0),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"id":6837401535245324288,"parent":"210116608"}"#
        );

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn string_form_accepts_integers_and_rejects_garbage() {
        let back: Event = serde_json::from_str(r#"{"id":1,"parent":2}"#).unwrap();
        assert_eq!(back.parent, FlakeId::from_raw(2));

        let err = serde_json::from_str::<Event>(r#"{"id":1,"parent":"-2"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn string_form_reads_from_compact_formats() {
        let id = crate::as_string::deserialize(CompactStr("210116608")).unwrap();
        assert_eq!(id, FlakeId::from_components(50, 3, 2, 0));

        assert!(crate::as_string::deserialize(CompactStr("nope")).is_err());
    }

    #[test]
    fn overflow_mode_is_kebab_case() {
        assert_eq!(
            serde_json::to_string(&OverflowMode::PerTick).unwrap(),
            r#""per-tick""#
        );
        let mode: OverflowMode = serde_json::from_str(r#""bulk""#).unwrap();
        assert_eq!(mode, OverflowMode::Bulk);
    }
}
