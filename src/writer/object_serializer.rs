//! Object syntax and file framing.
//!
//! [`ObjectSerializer`] writes the header, indirect objects, the cross-reference table
//! and the trailer straight to any [`Write`], counting bytes as it goes so the xref
//! offsets never need a second pass.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::object::{Dict, Object, ObjectRef};

/// Bytes that can appear in a name without `#xx` escaping.
fn is_regular_name_byte(byte: u8) -> bool {
    (b'!'..=b'~').contains(&byte)
        && !matches!(byte, b'#' | b'%' | b'(' | b')' | b'/' | b'[' | b']' | b'{' | b'}')
}

/// Literal syntax only round-trips printable ASCII.
fn is_literal_safe(data: &[u8]) -> bool {
    data.iter()
        .all(|&b| matches!(b, b'\n' | b'\r' | b'\t') || (0x20..=0x7E).contains(&b))
}

/// Write one object in compact syntax.
pub fn write_object<W: Write>(w: &mut W, obj: &Object) -> io::Result<()> {
    match obj {
        Object::Integer(i) => write!(w, "{}", i),
        Object::Real(r) => write_real(w, *r),
        Object::String(s) if is_literal_safe(s) => {
            w.write_all(b"(")?;
            for &byte in s {
                match byte {
                    b'(' | b')' | b'\\' => w.write_all(&[b'\\', byte])?,
                    b'\n' => w.write_all(b"\\n")?,
                    b'\r' => w.write_all(b"\\r")?,
                    b'\t' => w.write_all(b"\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            w.write_all(b")")
        },
        Object::String(s) => {
            w.write_all(b"<")?;
            for byte in s {
                write!(w, "{:02X}", byte)?;
            }
            w.write_all(b">")
        },
        Object::Name(n) => write_name(w, n),
        Object::Array(items) => {
            w.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    w.write_all(b" ")?;
                }
                write_object(w, item)?;
            }
            w.write_all(b"]")
        },
        Object::Dictionary(dict) => write_dict(w, dict, None),
        Object::Stream { dict, data } => {
            write_dict(w, dict, Some(data.len()))?;
            w.write_all(b"\nstream\n")?;
            w.write_all(data)?;
            w.write_all(b"\nendstream")
        },
        Object::Reference(r) => write!(w, "{}", r),
    }
}

/// Serialize one object to a byte vector.
pub fn to_bytes(obj: &Object) -> Vec<u8> {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_object(&mut buf, obj);
    buf
}

/// Reals with at most five decimals and no trailing zeros.
fn write_real<W: Write>(w: &mut W, value: f64) -> io::Result<()> {
    if value.fract() == 0.0 {
        return write!(w, "{}", value as i64);
    }
    let formatted = format!("{:.5}", value);
    w.write_all(formatted.trim_end_matches('0').trim_end_matches('.').as_bytes())
}

fn write_name<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    w.write_all(b"/")?;
    for byte in name.bytes() {
        if is_regular_name_byte(byte) {
            w.write_all(&[byte])?;
        } else {
            write!(w, "#{:02X}", byte)?;
        }
    }
    Ok(())
}

/// `stream_len` adds `/Length` when the dictionary does not carry one.
fn write_dict<W: Write>(w: &mut W, dict: &Dict, stream_len: Option<usize>) -> io::Result<()> {
    w.write_all(b"<<")?;
    for (key, value) in dict {
        write_name(w, key)?;
        w.write_all(b" ")?;
        write_object(w, value)?;
    }
    if let Some(len) = stream_len.filter(|_| !dict.contains_key("Length")) {
        write!(w, "/Length {}", len)?;
    }
    w.write_all(b">>")
}

/// Streams a whole PDF file: header, body, xref and trailer.
pub struct ObjectSerializer<W: Write> {
    out: W,
    written: usize,
    offsets: BTreeMap<u32, usize>,
}

impl<W: Write> ObjectSerializer<W> {
    /// Start a file and write its header.
    pub fn new(out: W, version: &str) -> io::Result<Self> {
        let mut serializer = Self {
            out,
            written: 0,
            offsets: BTreeMap::new(),
        };
        serializer.emit(format!("%PDF-{}\n", version).as_bytes())?;
        // high-bit comment marks the file as binary for transfer tools
        serializer.emit(b"%\xE2\xE3\xCF\xD3\n")?;
        Ok(serializer)
    }

    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    /// Write `obj` as indirect object `id`.
    pub fn indirect(&mut self, id: ObjectRef, obj: &Object) -> io::Result<()> {
        self.offsets.insert(id.0, self.written);
        let mut body = format!("{} 0 obj\n", id.0).into_bytes();
        write_object(&mut body, obj)?;
        body.extend_from_slice(b"\nendobj\n");
        self.emit(&body)
    }

    /// Write the xref table and `trailer`, then hand the sink back.
    ///
    /// Object numbers that were allocated but never written become free entries.
    pub fn finish(mut self, trailer: &Dict) -> io::Result<W> {
        let xref_start = self.written;
        let size = self.offsets.keys().next_back().map_or(1, |last| last + 1);
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for id in 1..size {
            match self.offsets.get(&id) {
                Some(offset) => table.push_str(&format!("{:010} 00000 n \n", offset)),
                None => table.push_str("0000000000 00001 f \n"),
            }
        }
        table.push_str("trailer\n");
        self.emit(table.as_bytes())?;

        let mut trailer = trailer.clone();
        trailer.insert("Size".to_string(), Object::Integer(size as i64));
        let mut tail = Vec::new();
        write_dict(&mut tail, &trailer, None)?;
        write!(tail, "\nstartxref\n{}\n%%EOF", xref_start)?;
        self.emit(&tail)?;
        self.out.flush()?;
        Ok(self.out)
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::dict;

    fn text(obj: &Object) -> String {
        String::from_utf8(to_bytes(obj)).unwrap()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(text(&Object::Integer(-123)), "-123");
        assert_eq!(text(&Object::Real(3.14258)), "3.14258");
        assert_eq!(text(&Object::Real(612.0)), "612");
        assert_eq!(text(&Object::Real(0.5)), "0.5");
    }

    #[test]
    fn test_strings_pick_syntax() {
        assert_eq!(text(&Object::String(b"Test (parens)".to_vec())), "(Test \\(parens\\))");
        assert_eq!(text(&Object::String(vec![0x00, 0xFF, 0x80])), "<00FF80>");
    }

    #[test]
    fn test_name_escaping() {
        assert_eq!(text(&Object::name("Type")), "/Type");
        assert_eq!(text(&Object::name("Name With Space")), "/Name#20With#20Space");
        assert_eq!(text(&Object::name("A#B")), "/A#23B");
    }

    #[test]
    fn test_dictionary_in_insertion_order() {
        let obj = Object::dict([
            ("Type", Object::name("Page")),
            ("MediaBox", Object::page_box(612.0, 792.0)),
            ("Parent", ObjectRef(2).into()),
        ]);
        assert_eq!(text(&obj), "<</Type /Page/MediaBox [0 0 612 792]/Parent 2 0 R>>");
    }

    #[test]
    fn test_stream_gets_length() {
        let stream = Object::Stream {
            dict: dict([("Filter", Object::name("FlateDecode"))]),
            data: bytes::Bytes::from_static(b"stream data"),
        };
        assert_eq!(
            text(&stream),
            "<</Filter /FlateDecode/Length 11>>\nstream\nstream data\nendstream"
        );
    }

    #[test]
    fn test_file_framing_offsets() {
        let mut s = ObjectSerializer::new(Vec::new(), "1.7").unwrap();
        let first = s.position();
        s.indirect(ObjectRef(1), &Object::Integer(42)).unwrap();
        s.indirect(ObjectRef(3), &Object::name("X")).unwrap();
        let bytes = s.finish(&dict([("Root", ObjectRef(1).into())])).unwrap();
        assert_eq!(&bytes[first..first + 8], b"1 0 obj\n");

        let out = String::from_utf8_lossy(&bytes).into_owned();
        assert!(out.starts_with("%PDF-1.7\n"));
        assert!(out.contains("xref\n0 4\n0000000000 65535 f \n"));
        assert!(out.contains(&format!("{:010} 00000 n \n0000000000 00001 f \n", first)));
        assert!(out.contains("trailer\n<</Root 1 0 R/Size 4>>\nstartxref\n"));
        assert!(out.ends_with("%%EOF"));
    }
}
