//! Multi-document template decoding.

use std::io;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::object::Object;

/// Lazily decodes a stream of YAML documents into [`Object`]s.
///
/// Empty documents are skipped. After the first error the decoder yields
/// nothing more.
pub struct Decoder<'de> {
    documents: serde_yaml::Deserializer<'de>,
    index: usize,
    failed: bool,
}

impl<'de> Decoder<'de> {
    pub fn from_reader<R: io::Read + 'de>(reader: R) -> Self {
        Self::new(serde_yaml::Deserializer::from_reader(reader))
    }

    pub fn from_str(input: &'de str) -> Self {
        Self::new(serde_yaml::Deserializer::from_str(input))
    }

    fn new(documents: serde_yaml::Deserializer<'de>) -> Self {
        Self {
            documents,
            index: 0,
            failed: false,
        }
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Object>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let document = self.documents.next()?;
            self.index += 1;
            let context = format!("template document {}", self.index);

            let value = match Value::deserialize(document) {
                Ok(Value::Null) => continue,
                Ok(value) => value,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::decode(context, e)));
                }
            };

            let object = Object::from_value(value).map_err(|message| Error::Decode { context, message });
            self.failed = object.is_err();
            return Some(object);
        }
    }
}

/// Decode the single object a rendered template file must contain.
pub fn decode_one(input: &str, context: &str) -> Result<Object> {
    let mut objects = Decoder::from_str(input)
        .map(|object| object.map_err(|e| e.within(context)))
        .collect::<Result<Vec<_>>>()?;

    match objects.len() {
        1 => Ok(objects.remove(0)),
        n => Err(Error::decode(
            context,
            format!("expected exactly one template document, found {n}"),
        )),
    }
}
