use encoding_rs::{Encoding, SHIFT_JIS, UTF_16LE};
use std::io::{self, Write};
use termcolor::{Ansi, BufferedStandardStream, ColorSpec, WriteColor};

use crate::cli::{Cli, EncodingMode};
use crate::utils::color_choice;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Buffered stdout in the requested encoding. Callers must flush.
pub fn make_encoded_writer(cli: &Cli) -> io::Result<Box<dyn WriteColor>> {
    let stream = BufferedStandardStream::stdout(color_choice(cli.color));
    encode_output(stream, cli.encoding)
}

/// Writes the BOM for `mode`, if any, and wraps `stream` to re-encode text.
pub fn encode_output<W: WriteColor + 'static>(
    mut stream: W,
    mode: EncodingMode,
) -> io::Result<Box<dyn WriteColor>> {
    Ok(match mode {
        EncodingMode::Utf8 | EncodingMode::Auto => Box::new(stream),
        EncodingMode::Utf8bom => {
            stream.write_all(&UTF8_BOM)?;
            Box::new(stream)
        }
        EncodingMode::Utf16le => {
            stream.write_all(&UTF16LE_BOM)?;
            Box::new(EncodingWriter::new(stream, UTF_16LE))
        }
        EncodingMode::Sjis => Box::new(EncodingWriter::new(stream, SHIFT_JIS)),
    })
}

/// Re-encodes UTF-8 writes into `encoding` before passing them on.
pub struct EncodingWriter<W: WriteColor> {
    inner: W,
    encoding: &'static Encoding,
}

impl<W: WriteColor> EncodingWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self { inner, encoding }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: WriteColor> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = std::str::from_utf8(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        // encoding_rs only encodes into ASCII-compatible targets.
        if self.encoding == UTF_16LE {
            let units: Vec<u8> = s.encode_utf16().flat_map(u16::to_le_bytes).collect();
            self.inner.write_all(&units)?;
            return Ok(buf.len());
        }
        let (cow, _, had_errors) = self.encoding.encode(s);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{s:?} is not representable in {}", self.encoding.name()),
            ));
        }
        self.inner.write_all(&cow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: WriteColor> WriteColor for EncodingWriter<W> {
    fn supports_color(&self) -> bool {
        self.inner.supports_color()
    }

    // Escapes are text too and go through the same encoding as the names.
    fn set_color(&mut self, spec: &ColorSpec) -> io::Result<()> {
        if !self.inner.supports_color() {
            return Ok(());
        }
        let mut escape = Ansi::new(Vec::new());
        escape.set_color(spec)?;
        self.write_all(&escape.into_inner())
    }

    fn reset(&mut self) -> io::Result<()> {
        if !self.inner.supports_color() {
            return Ok(());
        }
        let mut escape = Ansi::new(Vec::new());
        escape.reset()?;
        self.write_all(&escape.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use termcolor::{Color, NoColor};

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn encoded_bytes(mode: EncodingMode, text: &str) -> Vec<u8> {
        let sink = SharedSink::default();
        let mut out = encode_output(NoColor::new(sink.clone()), mode).expect("writer");
        out.write_all(text.as_bytes()).unwrap();
        out.flush().unwrap();
        drop(out);
        let bytes = sink.0.borrow().clone();
        bytes
    }

    #[test]
    fn utf8bom_prefixes_plain_utf8() {
        assert_eq!(encoded_bytes(EncodingMode::Utf8bom, "a\n"), b"\xEF\xBB\xBFa\n");
        assert_eq!(encoded_bytes(EncodingMode::Utf8, "a\n"), b"a\n");
    }

    #[test]
    fn utf16le_starts_with_bom() {
        assert_eq!(
            encoded_bytes(EncodingMode::Utf16le, "a"),
            vec![0xFF, 0xFE, b'a', 0x00]
        );
    }

    #[test]
    fn color_escapes_are_reencoded_as_utf16() {
        let mut out = EncodingWriter::new(Ansi::new(Vec::new()), UTF_16LE);
        out.write_all(b"a").unwrap();
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue))).unwrap();
        out.write_all(b"b").unwrap();
        out.reset().unwrap();
        let bytes = out.into_inner().into_inner();

        assert_eq!(bytes.len() % 2, 0);
        let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(&bytes);
        assert!(!had_errors);
        assert_eq!(decoded, "a\x1b[0m\x1b[34mb\x1b[0m");
    }

    #[test]
    fn box_drawing_survives_shift_jis() {
        let mut out = EncodingWriter::new(NoColor::new(Vec::new()), SHIFT_JIS);
        write!(out, "├── src\n│   └── x.py\n").unwrap();
        let bytes = out.into_inner().into_inner();

        let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
        assert!(!had_errors);
        assert_eq!(decoded, "├── src\n│   └── x.py\n");
    }

    #[test]
    fn utf16le_doubles_ascii_width() {
        let mut out = EncodingWriter::new(NoColor::new(Vec::new()), UTF_16LE);
        out.write_all("└── a".as_bytes()).unwrap();
        let bytes = out.into_inner().into_inner();
        assert_eq!(bytes.len(), "└── a".chars().count() * 2);
        assert_eq!(&bytes[..2], &[0x14, 0x25]);
    }

    #[test]
    fn unrepresentable_text_is_an_error() {
        let mut out = EncodingWriter::new(NoColor::new(Vec::new()), SHIFT_JIS);
        let err = out.write_all("└── 🦀".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
