//! Mapping between a serde value tree and XML events.
//!
//! Struct fields and enum tags become element names; every element
//! carries a `type` attribute so scalars decode back to the exact value
//! category they were encoded from. Sequence entries are `<item>`
//! elements. Keys therefore must be valid XML names, which holds for all
//! Rust identifiers.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

const ROOT: &str = "object";
const ITEM: &str = "item";
const TYPE_ATTR: &str = "type";

fn ser_err(err: impl std::fmt::Display) -> Error {
    Error::Serialization(err.to_string())
}

/// Writes a value tree as a standalone XML document.
pub(crate) fn write_document(tree: &Value) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(ser_err)?;
    write_element(&mut writer, ROOT, tree)?;
    String::from_utf8(writer.into_inner()).map_err(ser_err)
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> Result<()> {
    match value {
        Value::Null => write_empty(writer, name, "null"),
        Value::Bool(b) => write_scalar(writer, name, "bool", if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(writer, name, n),
        Value::String(s) => write_scalar(writer, name, "str", s),
        Value::Array(items) => {
            if items.is_empty() {
                return write_empty(writer, name, "seq");
            }
            writer
                .write_event(Event::Start(typed_start(name, "seq")))
                .map_err(ser_err)?;
            for item in items {
                write_element(writer, ITEM, item)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(ser_err)
        }
        Value::Object(map) => {
            if map.is_empty() {
                return write_empty(writer, name, "map");
            }
            writer
                .write_event(Event::Start(typed_start(name, "map")))
                .map_err(ser_err)?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(ser_err)
        }
    }
}

fn write_number<W: std::io::Write>(writer: &mut Writer<W>, name: &str, n: &Number) -> Result<()> {
    if n.is_u64() || n.is_i64() {
        let ty = if n.is_u64() { "uint" } else { "int" };
        write_scalar(writer, name, ty, &n.to_string())
    } else {
        let f = n
            .as_f64()
            .ok_or_else(|| Error::Serialization(format!("unrepresentable number {n}")))?;
        write_scalar(writer, name, "float", &format!("{f}"))
    }
}

fn typed_start<'a>(name: &'a str, ty: &str) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    element.push_attribute((TYPE_ATTR, ty));
    element
}

fn write_empty<W: std::io::Write>(writer: &mut Writer<W>, name: &str, ty: &str) -> Result<()> {
    writer
        .write_event(Event::Empty(typed_start(name, ty)))
        .map_err(ser_err)
}

fn write_scalar<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    ty: &str,
    text: &str,
) -> Result<()> {
    writer
        .write_event(Event::Start(typed_start(name, ty)))
        .map_err(ser_err)?;
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(ser_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(ser_err)
}

/// Parses a document written by [`write_document`] back into a value tree.
pub(crate) fn read_document(input: &str) -> Result<Value> {
    let mut reader = Reader::from_str(input);
    loop {
        match reader.read_event().map_err(ser_err)? {
            Event::Decl(_) | Event::Comment(_) | Event::DocType(_) | Event::PI(_) => continue,
            Event::Text(t) => {
                if is_blank(&t)? {
                    continue;
                }
                return Err(Error::Serialization(
                    "unexpected text before the root element".into(),
                ));
            }
            Event::Start(start) => return parse_element(&mut reader, start),
            Event::Empty(start) => return parse_empty(&start),
            Event::Eof => return Err(Error::Serialization("document has no root element".into())),
            other => {
                return Err(Error::Serialization(format!(
                    "unexpected content before the root element: {other:?}"
                )))
            }
        }
    }
}

fn is_blank(text: &BytesText) -> Result<bool> {
    let unescaped = text.unescape().map_err(ser_err)?;
    Ok(unescaped.chars().all(char::is_whitespace))
}

fn element_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn element_type(start: &BytesStart) -> Result<String> {
    let attr = start
        .try_get_attribute(TYPE_ATTR)
        .map_err(ser_err)?
        .ok_or_else(|| {
            Error::Serialization(format!(
                "element `{}` lacks a type attribute",
                element_name(start)
            ))
        })?;
    Ok(attr.unescape_value().map_err(ser_err)?.into_owned())
}

fn parse_empty(start: &BytesStart) -> Result<Value> {
    let ty = element_type(start)?;
    match ty.as_str() {
        "null" => Ok(Value::Null),
        "seq" => Ok(Value::Array(Vec::new())),
        "map" => Ok(Value::Object(Map::new())),
        "str" => Ok(Value::String(String::new())),
        other => Err(Error::Serialization(format!(
            "empty element `{}` cannot carry a `{other}` value",
            element_name(start)
        ))),
    }
}

fn parse_element(reader: &mut Reader<&[u8]>, start: BytesStart) -> Result<Value> {
    let ty = element_type(&start)?;
    match ty.as_str() {
        "map" => parse_map(reader),
        "seq" => parse_seq(reader),
        scalar => {
            let text = parse_text(reader, &start)?;
            scalar_value(scalar, text, &start)
        }
    }
}

fn parse_map(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut map = Map::new();
    loop {
        match reader.read_event().map_err(ser_err)? {
            Event::Start(child) => {
                let key = element_name(&child);
                let value = parse_element(reader, child)?;
                map.insert(key, value);
            }
            Event::Empty(child) => {
                map.insert(element_name(&child), parse_empty(&child)?);
            }
            Event::Text(t) => {
                // Indentation between child elements.
                if is_blank(&t)? {
                    continue;
                }
                return Err(Error::Serialization(
                    "unexpected text in a map element".into(),
                ));
            }
            Event::Comment(_) => continue,
            Event::End(_) => return Ok(Value::Object(map)),
            Event::Eof => return Err(Error::Serialization("unclosed map element".into())),
            other => {
                return Err(Error::Serialization(format!(
                    "unexpected content in a map element: {other:?}"
                )))
            }
        }
    }
}

fn parse_seq(reader: &mut Reader<&[u8]>) -> Result<Value> {
    let mut items = Vec::new();
    loop {
        match reader.read_event().map_err(ser_err)? {
            Event::Start(child) => items.push(parse_element(reader, child)?),
            Event::Empty(child) => items.push(parse_empty(&child)?),
            Event::Text(t) => {
                if is_blank(&t)? {
                    continue;
                }
                return Err(Error::Serialization(
                    "unexpected text in a seq element".into(),
                ));
            }
            Event::Comment(_) => continue,
            Event::End(_) => return Ok(Value::Array(items)),
            Event::Eof => return Err(Error::Serialization("unclosed seq element".into())),
            other => {
                return Err(Error::Serialization(format!(
                    "unexpected content in a seq element: {other:?}"
                )))
            }
        }
    }
}

fn parse_text(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(ser_err)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(ser_err)?),
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::Comment(_) => continue,
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(Error::Serialization(format!(
                    "unclosed element `{}`",
                    element_name(start)
                )))
            }
            other => {
                return Err(Error::Serialization(format!(
                    "unexpected content in scalar element `{}`: {other:?}",
                    element_name(start)
                )))
            }
        }
    }
}

fn scalar_value(ty: &str, text: String, start: &BytesStart) -> Result<Value> {
    match ty {
        "str" => Ok(Value::String(text)),
        "bool" => match text.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(Error::Serialization(format!(
                "invalid boolean `{other}` in element `{}`",
                element_name(start)
            ))),
        },
        "int" => {
            let n: i64 = text.trim().parse().map_err(ser_err)?;
            Ok(Value::Number(Number::from(n)))
        }
        "uint" => {
            let n: u64 = text.trim().parse().map_err(ser_err)?;
            Ok(Value::Number(Number::from(n)))
        }
        "float" => {
            let f: f64 = text.trim().parse().map_err(ser_err)?;
            let n = Number::from_f64(f).ok_or_else(|| {
                Error::Serialization(format!("non-finite float in element `{}`", element_name(start)))
            })?;
            Ok(Value::Number(n))
        }
        other => Err(Error::Serialization(format!(
            "unknown type tag `{other}` on element `{}`",
            element_name(start)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(value: Value) -> Value {
        let doc = write_document(&value).unwrap();
        read_document(&doc).unwrap()
    }

    #[test]
    fn test_scalar_round_trips() {
        for value in [
            Value::Null,
            json!(true),
            json!(false),
            json!(42u64),
            json!(-17),
            json!(0.25),
            json!(1.0e-10),
            json!("hello"),
            json!(""),
        ] {
            assert_eq!(round_trip(value.clone()), value);
        }
    }

    #[test]
    fn test_number_categories_are_preserved() {
        let tree = json!({"a": 1u64, "b": -1, "c": 1.0});
        let back = round_trip(tree);
        assert!(back["a"].is_u64());
        assert!(back["b"].is_i64());
        assert!(back["c"].is_f64());
    }

    #[test]
    fn test_float_precision_is_exact() {
        for f in [0.1, 1.0 / 3.0, f64::MIN_POSITIVE, 1234567.890123456, -0.0] {
            let back = round_trip(json!(f));
            assert_eq!(back.as_f64().unwrap().to_bits(), f.to_bits());
        }
    }

    #[test]
    fn test_nested_structure() {
        let tree = json!({
            "Gauss": {
                "state": {"name": "gauss", "probability": 1.0},
                "values": [1.0, 2.5, -3.0],
                "flags": [],
                "inner": {}
            }
        });
        assert_eq!(round_trip(tree.clone()), tree);
    }

    #[test]
    fn test_text_escaping() {
        let tree = json!({"name": "<evil & \"nasty\"> 'text'", "pad": "  spaced  "});
        assert_eq!(round_trip(tree.clone()), tree);
    }

    #[test]
    fn test_document_has_declaration() {
        let doc = write_document(&json!({"x": 1.0})).unwrap();
        assert!(doc.starts_with("<?xml version=\"1.0\""));
        assert!(doc.contains("<object type=\"map\">"));
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(read_document("").is_err());
        assert!(read_document("<object type=\"map\"><open></object>").is_err());
        assert!(read_document("<object>1</object>").is_err());
        assert!(read_document("<object type=\"wat\">1</object>").is_err());
        assert!(read_document("<object type=\"int\">abc</object>").is_err());
    }
}
