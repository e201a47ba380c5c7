//! Object ↔ string codecs.
//!
//! Every serializable domain object round-trips through three
//! interchangeable encodings:
//!
//! - [`Encoding::Text`]: pretty-printed JSON, for humans
//! - [`Encoding::Xml`]: element-per-field XML, the interoperability format
//! - [`Encoding::Binary`]: bincode bytes, base64-armoured so the
//!   object→string contract holds; lossless and fastest
//!
//! Polymorphic values (carriers, adaptors) are tagged enums, and serde's
//! external tagging writes the variant name ahead of the payload — that
//! tag is what lets a decoder resurrect the concrete kind.
//!
//! Random-number handles are never serialized; deserialized objects
//! re-attach to the process-wide service. Attached fitness evaluators and
//! personality bags are likewise not part of the encoded form.
//!
//! Binary round-trips are exact. Text and Xml print floats with Rust's
//! shortest-round-trip formatting, so they are exact in practice and in
//! any case within `1e-10` under `similar_to`.
//!
//! # Usage
//!
//! ```
//! use evoparam::carriers::DoubleCollection;
//! use evoparam::codec::{Encodable, Encoding};
//!
//! let xs = DoubleCollection::from_values(vec![1.0, 2.0]);
//! let text = xs.to_encoded(Encoding::Text).unwrap();
//! let back = DoubleCollection::from_encoded(&text, Encoding::Text).unwrap();
//! assert_eq!(back.values(), xs.values());
//! ```

mod xml;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The wire encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// Human-readable JSON.
    Text,
    /// Element-per-field XML.
    Xml,
    /// Base64-armoured bincode.
    Binary,
}

/// Encodes `value` in the given encoding.
pub fn to_string<T: Serialize>(value: &T, encoding: Encoding) -> Result<String> {
    match encoding {
        Encoding::Text => {
            serde_json::to_string_pretty(value).map_err(|e| Error::Serialization(e.to_string()))
        }
        Encoding::Xml => {
            let tree =
                serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))?;
            xml::write_document(&tree)
        }
        Encoding::Binary => {
            let bytes =
                bincode::serialize(value).map_err(|e| Error::Serialization(e.to_string()))?;
            Ok(BASE64.encode(bytes))
        }
    }
}

/// Decodes a value from the given encoding.
pub fn from_string<T: DeserializeOwned>(input: &str, encoding: Encoding) -> Result<T> {
    match encoding {
        Encoding::Text => {
            serde_json::from_str(input).map_err(|e| Error::Serialization(e.to_string()))
        }
        Encoding::Xml => {
            let tree = xml::read_document(input)?;
            serde_json::from_value(tree).map_err(|e| Error::Serialization(e.to_string()))
        }
        Encoding::Binary => {
            let bytes = BASE64
                .decode(input)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            bincode::deserialize(&bytes).map_err(|e| Error::Serialization(e.to_string()))
        }
    }
}

/// Blanket encode/decode surface for serializable types.
pub trait Encodable: Serialize + DeserializeOwned {
    /// Encodes `self` in the given encoding.
    fn to_encoded(&self, encoding: Encoding) -> Result<String> {
        to_string(self, encoding)
    }

    /// Decodes a value of this type from the given encoding.
    fn from_encoded(input: &str, encoding: Encoding) -> Result<Self> {
        from_string(input, encoding)
    }
}

impl<T: Serialize + DeserializeOwned> Encodable for T {}
