//! Write-side PDF object model.
//!
//! Only what a generated document needs: no null or boolean objects, no parsing
//! helpers. Dictionaries keep insertion order so output is reproducible without
//! sorting keys.

use indexmap::IndexMap;

/// Dictionary entries in the order they were added.
pub type Dict = IndexMap<String, Object>;

/// A PDF object ready to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i64),
    Real(f64),
    /// Raw string bytes; the serializer picks literal or hex syntax.
    String(Vec<u8>),
    /// Name without the leading slash.
    Name(String),
    Array(Vec<Object>),
    Dictionary(Dict),
    /// Stream; `Length` is filled in by the serializer when absent.
    Stream { dict: Dict, data: bytes::Bytes },
    Reference(ObjectRef),
}

/// Number of an indirect object. Generated files never reuse numbers, so the
/// generation is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub u32);

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

impl From<ObjectRef> for Object {
    fn from(r: ObjectRef) -> Self {
        Object::Reference(r)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<f32> for Object {
    fn from(value: f32) -> Self {
        Object::Real(value as f64)
    }
}

impl From<Dict> for Object {
    fn from(dict: Dict) -> Self {
        Object::Dictionary(dict)
    }
}

impl From<Vec<Object>> for Object {
    fn from(items: Vec<Object>) -> Self {
        Object::Array(items)
    }
}

impl Object {
    pub fn name(name: &str) -> Object {
        Object::Name(name.to_string())
    }

    /// Text string: PDFDocEncoding-compatible ASCII as is, anything else as UTF-16BE
    /// with a byte order mark.
    pub fn text_string(text: &str) -> Object {
        if text.is_ascii() {
            return Object::String(text.as_bytes().to_vec());
        }
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes)
    }

    /// Dictionary from `(key, value)` pairs, keeping their order.
    pub fn dict<'a, I>(entries: I) -> Object
    where
        I: IntoIterator<Item = (&'a str, Object)>,
    {
        Object::Dictionary(dict(entries))
    }

    /// `[0 0 width height]` box in points.
    pub fn page_box(width: f32, height: f32) -> Object {
        Object::Array(vec![0i64.into(), 0i64.into(), width.into(), height.into()])
    }
}

/// [`Dict`] from `(key, value)` pairs, keeping their order.
pub fn dict<'a, I>(entries: I) -> Dict
where
    I: IntoIterator<Item = (&'a str, Object)>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
