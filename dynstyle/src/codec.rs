// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tagged persistence of style values.
//!
//! Every style value serializes to a keyed object `{"type": TAG, "value": {...}}`
//! where the inner object carries one stable key per field and omits unset
//! optional fields. [`prepare`] builds the process-wide table that decodes a
//! tagged value of any registered type; it runs once no matter how often it
//! is called.

use std::sync::OnceLock;

use hashbrown::HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::attribute::StyleAttribute;
use crate::border::Border;
use crate::color::Color;
use crate::compositor::DrawingStyle;
use crate::fill::Fill;
use crate::gradient::Gradient;
use crate::shadow::Shadow;
use crate::style::{ButtonStyle, ViewStyle};
use crate::text::TextStyle;

const TYPE_KEY: &str = "type";
const VALUE_KEY: &str = "value";

/// Errors from encoding or decoding style values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be encoded.
    #[error("failed to encode style value: {0}")]
    Encode(#[source] serde_json::Error),
    /// The value is malformed or misses a required field.
    #[error("failed to decode style value: {0}")]
    Decode(#[source] serde_json::Error),
    /// The tag names no registered value type.
    #[error("unknown style value type '{0}'")]
    UnknownTag(String),
    /// The value carries no type tag.
    #[error("style value has no 'type' tag")]
    MissingTag,
    /// The tag names a different type than the one requested.
    #[error("expected a '{expected}' value, found '{found}'")]
    UnexpectedTag {
        /// The requested type's tag.
        expected: &'static str,
        /// The tag that was found.
        found: String,
    },
}

/// A style value type with a stable persisted tag.
pub trait StyleValue: Serialize + DeserializeOwned {
    /// Tag identifying this type in persisted form.
    const TAG: &'static str;
}

macro_rules! style_values {
    ($($ty:ident => $tag:literal),* $(,)?) => {
        $(
            impl StyleValue for $ty {
                const TAG: &'static str = $tag;
            }
        )*

        /// A decoded style value of any registered type.
        #[derive(Clone, Debug, PartialEq)]
        #[expect(missing_docs, reason = "variants are named after the types they hold")]
        pub enum AnyStyleValue {
            $($ty($ty),)*
        }

        impl AnyStyleValue {
            /// The persisted tag of the held value.
            pub fn tag(&self) -> &'static str {
                match self {
                    $(Self::$ty(_) => $tag,)*
                }
            }
        }

        fn decoders() -> HashMap<&'static str, Decoder> {
            let mut table: HashMap<&'static str, Decoder> = HashMap::new();
            $(
                table.insert($tag, |value| serde_json::from_value(value).map(AnyStyleValue::$ty));
            )*
            table
        }
    };
}

style_values! {
    Color => "color",
    Gradient => "gradient",
    Border => "border",
    Shadow => "shadow",
    Fill => "fill",
    StyleAttribute => "style_attribute",
    DrawingStyle => "drawing_style",
    ViewStyle => "view_style",
    ButtonStyle => "button_style",
    TextStyle => "text_style",
}

type Decoder = fn(Value) -> Result<AnyStyleValue, serde_json::Error>;

/// The table of decodable style value types.
pub struct Codec {
    decoders: HashMap<&'static str, Decoder>,
}

impl core::fmt::Debug for Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut tags: Vec<_> = self.decoders.keys().collect();
        tags.sort_unstable();
        f.debug_struct("Codec").field("tags", &tags).finish()
    }
}

impl Codec {
    /// Returns `true` if values tagged `tag` can be decoded.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }

    /// Decode a tagged value of whichever type its tag names.
    pub fn decode(&self, tagged: &Value) -> Result<AnyStyleValue, CodecError> {
        let (tag, value) = split_tagged(tagged)?;
        let decode = self
            .decoders
            .get(tag)
            .ok_or_else(|| CodecError::UnknownTag(tag.to_owned()))?;
        decode(value.clone()).map_err(CodecError::Decode)
    }
}

/// Register every style value type with the codec.
///
/// Idempotent: the table is built on first call and shared afterwards.
pub fn prepare() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(|| Codec {
        decoders: decoders(),
    })
}

/// Encode `value` into its tagged form.
pub fn serialize<T: StyleValue>(value: &T) -> Result<Value, CodecError> {
    let inner = serde_json::to_value(value).map_err(CodecError::Encode)?;
    let mut map = Map::new();
    map.insert(TYPE_KEY.to_owned(), Value::String(T::TAG.to_owned()));
    map.insert(VALUE_KEY.to_owned(), inner);
    Ok(Value::Object(map))
}

/// Decode a tagged value as `T`.
pub fn deserialize<T: StyleValue>(tagged: &Value) -> Result<T, CodecError> {
    let (tag, value) = split_tagged(tagged)?;
    if tag != T::TAG {
        return Err(CodecError::UnexpectedTag {
            expected: T::TAG,
            found: tag.to_owned(),
        });
    }
    T::deserialize(value).map_err(CodecError::Decode)
}

/// Decode a tagged value of any registered type.
pub fn deserialize_any(tagged: &Value) -> Result<AnyStyleValue, CodecError> {
    prepare().decode(tagged)
}

/// Encode `value` as a tagged JSON string.
pub fn to_string<T: StyleValue>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(&serialize(value)?).map_err(CodecError::Encode)
}

/// Decode a tagged JSON string as `T`.
pub fn from_str<T: StyleValue>(json: &str) -> Result<T, CodecError> {
    let tagged: Value = serde_json::from_str(json).map_err(CodecError::Decode)?;
    deserialize(&tagged)
}

fn split_tagged(tagged: &Value) -> Result<(&str, &Value), CodecError> {
    static NULL: Value = Value::Null;
    let tag = tagged
        .get(TYPE_KEY)
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingTag)?;
    let value = tagged.get(VALUE_KEY).unwrap_or(&NULL);
    Ok((tag, value))
}
