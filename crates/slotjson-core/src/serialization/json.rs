//! JSON text output as tree visitors

use std::convert::Infallible;
use std::fmt;

use smallvec::SmallVec;
use slotjson_domain::Visitor;

use super::writer::Writer;

/// Largest integral float printed without exponent or fraction
const PLAIN_INTEGER_BOUND: f64 = 1e15;

/// A writer that counts what it accepted
struct Output<W> {
    writer: W,
    written: usize,
}

impl<W: Writer> Output<W> {
    fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    fn text(&mut self, text: &str) {
        self.written += self.writer.write_text(text);
    }

    fn float(&mut self, value: f64) {
        if !value.is_finite() {
            self.text("null");
        } else if value.fract() == 0.0 && value.abs() < PLAIN_INTEGER_BOUND {
            self.display(value as i64);
        } else {
            // shortest round-trip form, exponent for very large or small values
            let _ = fmt::Write::write_fmt(self, format_args!("{value:?}"));
        }
    }

    fn display(&mut self, value: impl fmt::Display) {
        let _ = fmt::Write::write_fmt(self, format_args!("{value}"));
    }

    fn string(&mut self, text: &str) {
        self.text("\"");
        let mut start = 0;
        for (index, byte) in text.bytes().enumerate() {
            let escape = match byte {
                b'"' => "\\\"",
                b'\\' => "\\\\",
                0x08 => "\\b",
                0x0c => "\\f",
                b'\n' => "\\n",
                b'\r' => "\\r",
                b'\t' => "\\t",
                0x00..=0x1f => {
                    self.text(&text[start..index]);
                    let _ = fmt::Write::write_fmt(self, format_args!("\\u{byte:04x}"));
                    start = index + 1;
                    continue;
                }
                _ => continue,
            };
            self.text(&text[start..index]);
            self.text(escape);
            start = index + 1;
        }
        self.text(&text[start..]);
        self.text("\"");
    }
}

impl<W: Writer> fmt::Write for Output<W> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.text(text);
        Ok(())
    }
}

/// Compact JSON serializer
///
/// Feed it a tree with [`accept`](slotjson_domain::accept) or
/// [`VariantConstRef::accept`](slotjson_domain::VariantConstRef::accept).
pub struct JsonSerializer<W> {
    out: Output<W>,
}

impl<W: Writer> JsonSerializer<W> {
    /// Serializer writing to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            out: Output::new(writer),
        }
    }

    /// Bytes the writer accepted so far
    pub fn bytes_written(&self) -> usize {
        self.out.written
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out.writer
    }
}

impl<W: Writer> Visitor for JsonSerializer<W> {
    type Error = Infallible;

    fn visit_null(&mut self) -> Result<(), Infallible> {
        self.out.text("null");
        Ok(())
    }

    fn visit_bool(&mut self, value: bool) -> Result<(), Infallible> {
        self.out.text(if value { "true" } else { "false" });
        Ok(())
    }

    fn visit_signed(&mut self, value: i64) -> Result<(), Infallible> {
        self.out.display(value);
        Ok(())
    }

    fn visit_unsigned(&mut self, value: u64) -> Result<(), Infallible> {
        self.out.display(value);
        Ok(())
    }

    fn visit_float(&mut self, value: f64) -> Result<(), Infallible> {
        self.out.float(value);
        Ok(())
    }

    fn visit_string(&mut self, value: &str) -> Result<(), Infallible> {
        self.out.string(value);
        Ok(())
    }

    fn begin_array(&mut self, _len: usize) -> Result<(), Infallible> {
        self.out.text("[");
        Ok(())
    }

    fn begin_element(&mut self, index: usize) -> Result<(), Infallible> {
        if index > 0 {
            self.out.text(",");
        }
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Infallible> {
        self.out.text("]");
        Ok(())
    }

    fn begin_object(&mut self, _len: usize) -> Result<(), Infallible> {
        self.out.text("{");
        Ok(())
    }

    fn visit_key(&mut self, key: &str, index: usize) -> Result<(), Infallible> {
        if index > 0 {
            self.out.text(",");
        }
        self.out.string(key);
        self.out.text(":");
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Infallible> {
        self.out.text("}");
        Ok(())
    }
}

/// JSON serializer indenting two spaces per level
///
/// Empty containers print as `[]` and `{}`; members print as `"key": value`.
pub struct PrettyJsonSerializer<W> {
    out: Output<W>,
    nesting: usize,
    // whether each open container has children
    open: SmallVec<[bool; 16]>,
}

impl<W: Writer> PrettyJsonSerializer<W> {
    /// Serializer writing to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            out: Output::new(writer),
            nesting: 0,
            open: SmallVec::new(),
        }
    }

    /// Bytes the writer accepted so far
    pub fn bytes_written(&self) -> usize {
        self.out.written
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out.writer
    }

    fn new_line(&mut self) {
        self.out.text("\n");
        for _ in 0..self.nesting {
            self.out.text("  ");
        }
    }

    fn begin(&mut self, bracket: &str, len: usize) {
        self.out.text(bracket);
        self.open.push(len > 0);
        if len > 0 {
            self.nesting += 1;
        }
    }

    fn end(&mut self, bracket: &str) {
        if self.open.pop().unwrap_or(false) {
            self.nesting = self.nesting.saturating_sub(1);
            self.new_line();
        }
        self.out.text(bracket);
    }
}

impl<W: Writer> Visitor for PrettyJsonSerializer<W> {
    type Error = Infallible;

    fn visit_null(&mut self) -> Result<(), Infallible> {
        self.out.text("null");
        Ok(())
    }

    fn visit_bool(&mut self, value: bool) -> Result<(), Infallible> {
        self.out.text(if value { "true" } else { "false" });
        Ok(())
    }

    fn visit_signed(&mut self, value: i64) -> Result<(), Infallible> {
        self.out.display(value);
        Ok(())
    }

    fn visit_unsigned(&mut self, value: u64) -> Result<(), Infallible> {
        self.out.display(value);
        Ok(())
    }

    fn visit_float(&mut self, value: f64) -> Result<(), Infallible> {
        self.out.float(value);
        Ok(())
    }

    fn visit_string(&mut self, value: &str) -> Result<(), Infallible> {
        self.out.string(value);
        Ok(())
    }

    fn begin_array(&mut self, len: usize) -> Result<(), Infallible> {
        self.begin("[", len);
        Ok(())
    }

    fn begin_element(&mut self, index: usize) -> Result<(), Infallible> {
        if index > 0 {
            self.out.text(",");
        }
        self.new_line();
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Infallible> {
        self.end("]");
        Ok(())
    }

    fn begin_object(&mut self, len: usize) -> Result<(), Infallible> {
        self.begin("{", len);
        Ok(())
    }

    fn visit_key(&mut self, key: &str, index: usize) -> Result<(), Infallible> {
        if index > 0 {
            self.out.text(",");
        }
        self.new_line();
        self.out.string(key);
        self.out.text(": ");
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Infallible> {
        self.end("}");
        Ok(())
    }
}
