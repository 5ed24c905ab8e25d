use std::fmt;

use tracing::debug;

use crate::id3v2::frames::{self, Category, FrameKind};
use crate::id3v2::genre;
use crate::id3v2::regex::{get_number, get_number_pair};
use crate::id3v2::specs::{read_encoding, FieldValue, SpecKind};
use crate::tools::encoding::TextEncoding;
use crate::Error;
use crate::Image;
use crate::TimeStamp;

/// Identity of a frame inside a tag. Frames with equal keys collide and the
/// later one wins; the key never includes the payload text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey(String);

impl HashKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for HashKey {
    fn from(key: &'a str) -> HashKey {
        HashKey(key.to_string())
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    kind: &'static FrameKind,
    encoding: Option<TextEncoding>,
    fields: Vec<Field>,
    hash_key: HashKey,
}

fn compute_hash_key(kind: &FrameKind, fields: &[Field]) -> HashKey {
    let mut key = kind.id.to_string();
    for name in kind.key_fields {
        key.push(':');
        if let Some(text) = fields
            .iter()
            .find(|f| f.name == *name)
            .and_then(|f| f.value.as_text())
        {
            key.push_str(&text);
        }
    }
    HashKey(key)
}

impl Frame {
    fn assemble(kind: &'static FrameKind, encoding: Option<TextEncoding>, fields: Vec<Field>) -> Frame {
        let hash_key = compute_hash_key(kind, &fields);
        Frame {
            kind,
            encoding,
            fields,
            hash_key,
        }
    }

    /// Runs a frame payload (already inflated and resynchronized) through the
    /// field layout of `kind`.
    pub fn decode(kind: &'static FrameKind, data: &[u8]) -> Result<Frame, Error> {
        let mut encoding = None;
        let mut active = TextEncoding::Latin1;
        let mut fields = Vec::with_capacity(kind.specs.len());
        let mut rest = data;

        for spec in kind.specs {
            if spec.kind == SpecKind::Encoding {
                let (enc, r) = read_encoding(rest)?;
                encoding = Some(enc);
                active = enc;
                rest = r;
                continue;
            }
            let (value, r) = spec.kind.read(active, rest)?;
            fields.push(Field {
                name: spec.name,
                value,
            });
            rest = r;
        }

        if rest.iter().any(|b| *b != 0) {
            debug!(frame = kind.id, left = rest.len(), "trailing data after frame fields");
        }
        Ok(Frame::assemble(kind, encoding, fields))
    }

    pub fn id(&self) -> &'static str {
        self.kind.id
    }

    pub fn kind(&self) -> &'static FrameKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category
    }

    pub fn encoding(&self) -> Option<TextEncoding> {
        self.encoding
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn hash_key(&self) -> &HashKey {
        &self.hash_key
    }

    /// The text values, in order. Frames without text give an empty list.
    pub fn text(&self) -> Vec<String> {
        match self.field("text") {
            Some(FieldValue::List(values)) => values.iter().filter_map(|v| v.as_text()).collect(),
            Some(v) => v.as_text().into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn text_field(&self, name: &str) -> Option<String> {
        self.field(name).and_then(|v| v.as_text())
    }

    pub fn description(&self) -> Option<String> {
        self.text_field("desc")
    }

    pub fn language(&self) -> Option<String> {
        self.text_field("lang")
    }

    pub fn url(&self) -> Option<String> {
        self.text_field("url")
    }

    pub fn mime(&self) -> Option<String> {
        self.text_field("mime")
    }

    pub fn owner(&self) -> Option<String> {
        self.text_field("owner")
    }

    pub fn timestamps(&self) -> Vec<TimeStamp> {
        match self.field("text") {
            Some(FieldValue::List(values)) => values
                .iter()
                .filter_map(|v| match v {
                    FieldValue::TimeStamp(ts) => Some(ts.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Genres of a content type frame, decoded through the genre grammar.
    pub fn genres(&self) -> Vec<String> {
        if !self.category().decodes_genres() {
            return Vec::new();
        }
        genre::parse(&self.text().join("\0"))
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self.field("data") {
            Some(FieldValue::Binary(v)) => Some(v),
            _ => None,
        }
    }

    pub fn picture_type(&self) -> Option<u8> {
        match self.field("type") {
            Some(FieldValue::Byte(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<Image> {
        if self.category() != Category::Picture {
            return None;
        }
        Image::from_data(self.data()?.to_vec())
    }

    /// Numeric value of a numeric text frame: the whole text for plain numeric
    /// frames, `N` of `N/M` for part-of-set frames.
    pub fn as_number(&self) -> Result<i64, Error> {
        self.as_number_pair().map(|(n, _)| n)
    }

    pub fn as_number_pair(&self) -> Result<(i64, Option<i64>), Error> {
        let text = self.text().into_iter().next().unwrap_or_default();
        let parsed = match self.category() {
            Category::NumericText => get_number(&text).map(|n| (n, None)),
            Category::NumericPartText => get_number_pair(&text),
            _ => None,
        };
        parsed.ok_or_else(|| Error::NotNumeric(text))
    }

    /// Re-expresses the frame as a frame of `target`, carrying over every
    /// field the two layouts share by name.
    pub fn convert(&self, target: &'static FrameKind) -> Frame {
        let mut builder = FrameBuilder::new(target);
        if let Some(enc) = self.encoding {
            builder = builder.encoding(enc);
        }
        for field in &self.fields {
            let value = match (self.kind.id, field.name, &field.value) {
                ("PIC", "mime", FieldValue::Text(format)) => {
                    FieldValue::Text(picture_format_to_mime(format))
                }
                _ => field.value.clone(),
            };
            builder = builder.field(field.name, value);
        }
        builder.build()
    }
}

fn picture_format_to_mime(format: &str) -> String {
    match format.to_ascii_uppercase().as_str() {
        "JPG" => "image/jpeg".to_string(),
        "PNG" => "image/png".to_string(),
        _ => format.to_string(),
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.category() {
            Category::TimeStampText => {
                let stamps: Vec<String> = self.timestamps().iter().map(|t| t.text()).collect();
                f.write_str(&stamps.join(","))
            }
            c if c.renders_as_text() => f.write_str(&self.text().join("\0")),
            Category::UrlLink | Category::UserUrl => f.write_str(&self.url().unwrap_or_default()),
            Category::Picture => write!(
                f,
                "{} ({} bytes)",
                self.mime().unwrap_or_default(),
                self.data().map_or(0, |d| d.len())
            ),
            _ => match self.data() {
                Some(d) => write!(f, "{} ({} bytes)", self.id(), d.len()),
                None => f.write_str(self.id()),
            },
        }
    }
}

/// Assembles a frame in memory from field values.
///
/// Supplied values are coerced to the layout of the kind, missing ones take
/// the field's default, and values for fields the layout lacks are ignored.
pub struct FrameBuilder {
    kind: &'static FrameKind,
    encoding: Option<TextEncoding>,
    values: Vec<(String, FieldValue)>,
}

impl FrameBuilder {
    pub fn new(kind: &'static FrameKind) -> FrameBuilder {
        FrameBuilder {
            kind,
            encoding: None,
            values: Vec::new(),
        }
    }

    /// Builder for a registered id; three character ids select the v2.2 table.
    pub fn for_id(id: &str) -> Option<FrameBuilder> {
        frames::lookup_any(id).map(FrameBuilder::new)
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> FrameBuilder {
        self.encoding = Some(encoding);
        self
    }

    pub fn field(mut self, name: &str, value: FieldValue) -> FrameBuilder {
        self.values.retain(|(n, _)| n != name);
        self.values.push((name.to_string(), value));
        self
    }

    pub fn text(self, text: &str) -> FrameBuilder {
        self.field("text", FieldValue::Text(text.to_string()))
    }

    pub fn texts<I, S>(self, texts: I) -> FrameBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = texts
            .into_iter()
            .map(|s| FieldValue::Text(s.into()))
            .collect();
        self.field("text", FieldValue::List(values))
    }

    /// Genre names stored literally. A leading `(` is doubled so the name is
    /// not read back as a genre reference.
    pub fn genres<I, S>(self, genres: I) -> FrameBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts(genres.into_iter().map(|g| {
            let g = g.into();
            if g.starts_with('(') {
                format!("({}", g)
            } else {
                g
            }
        }))
    }

    pub fn description(self, desc: &str) -> FrameBuilder {
        self.field("desc", FieldValue::Text(desc.to_string()))
    }

    pub fn language(self, lang: &str) -> FrameBuilder {
        self.field("lang", FieldValue::Text(lang.to_string()))
    }

    pub fn url(self, url: &str) -> FrameBuilder {
        self.field("url", FieldValue::Text(url.to_string()))
    }

    pub fn build(mut self) -> Frame {
        let mut fields = Vec::with_capacity(self.kind.specs.len());
        let mut encoding = None;
        for spec in self.kind.specs {
            if spec.kind == SpecKind::Encoding {
                encoding = Some(self.encoding.unwrap_or_default());
                continue;
            }
            let value = match self.values.iter().position(|(n, _)| n == spec.name) {
                Some(i) => self.values.swap_remove(i).1.coerce(spec.kind),
                None => FieldValue::default_for(spec.kind),
            };
            fields.push(Field {
                name: spec.name,
                value,
            });
        }
        Frame::assemble(self.kind, encoding, fields)
    }
}
