//! # Schema and Example Payloads
//!
//! `schema` and `example` values are often JSON or XML documents embedded as text. They are
//! decoded into a [`Value`] tree when they parse as either; anything else is kept as declared.
//!
//! XML follows the usual element-to-mapping convention: attributes become `@name` keys,
//! text next to attributes or children becomes `#text`, and repeated children become a
//! sequence.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_yaml::{Mapping, Value};

/// Decodes JSON text, then XML text; other values are returned unchanged.
pub fn load_schema(data: Value) -> Value {
    let Value::String(text) = &data else {
        return data;
    };
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        if let Ok(decoded) = serde_yaml::to_value(json) {
            return decoded;
        }
    }
    match xml_to_value(text) {
        Ok(Some(decoded)) => decoded,
        Ok(None) => data,
        Err(e) => {
            tracing::trace!(error = %e, "payload is neither JSON nor XML");
            data
        }
    }
}

struct XmlElement {
    name: String,
    children: Mapping,
    text: String,
}

impl XmlElement {
    fn open(start: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let mut children = Mapping::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value()?.into_owned();
            children.insert(Value::String(key), Value::String(value));
        }
        Ok(XmlElement {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            children,
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        let key = Value::String(name);
        match self.children.get_mut(&key) {
            Some(Value::Sequence(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Sequence(vec![first, value]);
            }
            None => {
                self.children.insert(key, value);
            }
        }
    }

    fn finish(mut self) -> (String, Value) {
        let value = match (self.children.is_empty(), self.text.is_empty()) {
            (true, true) => Value::Null,
            (true, false) => Value::String(self.text),
            (false, text_empty) => {
                if !text_empty {
                    self.children
                        .insert(Value::String("#text".into()), Value::String(self.text));
                }
                Value::Mapping(self.children)
            }
        };
        (self.name, value)
    }
}

/// `Ok(None)` when `text` is not a single well-formed XML element.
fn xml_to_value(text: &str) -> Result<Option<Value>, quick_xml::Error> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<Value> = None;
    loop {
        let closed = match reader.read_event()? {
            Event::Start(start) => {
                stack.push(XmlElement::open(&start)?);
                None
            }
            Event::Empty(start) => Some(XmlElement::open(&start)?),
            Event::End(_) => stack.pop(),
            Event::Text(t) => {
                let Some(open) = stack.last_mut() else {
                    return Ok(None);
                };
                open.text.push_str(&t.unescape()?);
                None
            }
            Event::CData(c) => {
                let Some(open) = stack.last_mut() else {
                    return Ok(None);
                };
                open.text.push_str(&String::from_utf8_lossy(&c));
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = closed {
            let (name, value) = element.finish();
            match stack.last_mut() {
                Some(parent) => parent.add_child(name, value),
                None if root.is_none() => {
                    let mut doc = Mapping::new();
                    doc.insert(Value::String(name), value);
                    root = Some(Value::Mapping(doc));
                }
                None => return Ok(None),
            }
        }
    }

    if !stack.is_empty() {
        return Ok(None);
    }
    Ok(root)
}
