// ── Text encodings ────────────────────────────────────────────────────────────
//
// Decoding of file bytes into a `String` and back.  The in-memory document is
// always UTF-8; `Encoding` records what should be used when writing to disk.

/// The character encoding of a file on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Encoding {
    /// UTF-8 without BOM.
    #[default]
    Utf8,
    /// UTF-8 with the `EF BB BF` BOM.
    Utf8Bom,
    /// UTF-16 Little-Endian with BOM.
    Utf16Le,
    /// UTF-16 Big-Endian with BOM.
    Utf16Be,
}

impl Encoding {
    /// Short display string shown in the status line.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 BOM",
            Self::Utf16Le => "UTF-16 LE",
            Self::Utf16Be => "UTF-16 BE",
        }
    }

    /// Detect the encoding of `bytes` and decode them.
    ///
    /// Detection order:
    /// 1. UTF-16 LE BOM (`FF FE`)
    /// 2. UTF-16 BE BOM (`FE FF`)
    /// 3. UTF-8 BOM (`EF BB BF`)
    /// 4. Valid UTF-8
    ///
    /// Returns `None` when the bytes are not decodable text.
    pub(crate) fn detect_and_decode(bytes: &[u8]) -> Option<(Self, String)> {
        if let Some(payload) = bytes.strip_prefix(&[0xFF, 0xFE]) {
            let units = utf16_units(payload, u16::from_le_bytes)?;
            return String::from_utf16(&units).ok().map(|s| (Self::Utf16Le, s));
        }

        if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
            let units = utf16_units(payload, u16::from_be_bytes)?;
            return String::from_utf16(&units).ok().map(|s| (Self::Utf16Be, s));
        }

        if let Some(payload) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
            return std::str::from_utf8(payload)
                .ok()
                .map(|s| (Self::Utf8Bom, s.to_owned()));
        }

        std::str::from_utf8(bytes)
            .ok()
            .map(|s| (Self::Utf8, s.to_owned()))
    }

    /// Encode `text` for disk, BOM included where the encoding has one.
    pub(crate) fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf8Bom => {
                let mut out = vec![0xEF_u8, 0xBB, 0xBF];
                out.extend_from_slice(text.as_bytes());
                out
            }
            Self::Utf16Le => {
                let mut out = vec![0xFF_u8, 0xFE]; // LE BOM
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            Self::Utf16Be => {
                let mut out = vec![0xFE_u8, 0xFF]; // BE BOM
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                out
            }
        }
    }
}

/// Odd-length UTF-16 payloads are not text.
fn utf16_units(payload: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Option<Vec<u16>> {
    if payload.len() % 2 != 0 {
        return None;
    }
    Some(
        payload
            .chunks_exact(2)
            .map(|c| from_bytes([c[0], c[1]]))
            .collect(),
    )
}

// ── EOL mode ──────────────────────────────────────────────────────────────────

/// The end-of-line convention used by a document.  Reported, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EolMode {
    Crlf,
    Lf,
    Cr,
}

impl EolMode {
    /// Short display string shown in the status line.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "CRLF",
            Self::Lf => "LF",
            Self::Cr => "CR",
        }
    }

    /// Detect the dominant EOL style in `text`.
    ///
    /// Falls back to `Lf` when no line endings are present.
    pub(crate) fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    crlf += 1;
                    i += 2;
                }
                b'\r' => {
                    cr += 1;
                    i += 1;
                }
                b'\n' => {
                    lf += 1;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        if crlf > lf && crlf >= cr {
            Self::Crlf
        } else if cr > lf {
            Self::Cr
        } else {
            Self::Lf
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_utf16le() {
        let (enc, text) = Encoding::detect_and_decode(b"\xFF\xFEh\x00i\x00").unwrap();
        assert_eq!(enc, Encoding::Utf16Le);
        assert_eq!(text, "hi");
    }

    #[test]
    fn detect_utf16be() {
        let (enc, text) = Encoding::detect_and_decode(b"\xFE\xFF\x00h\x00i").unwrap();
        assert_eq!(enc, Encoding::Utf16Be);
        assert_eq!(text, "hi");
    }

    #[test]
    fn detect_utf8_bom() {
        let (enc, text) = Encoding::detect_and_decode(b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(enc, Encoding::Utf8Bom);
        assert_eq!(text, "hello");
    }

    #[test]
    fn plain_utf8() {
        let (enc, text) = Encoding::detect_and_decode("tab\there".as_bytes()).unwrap();
        assert_eq!(enc, Encoding::Utf8);
        assert_eq!(text, "tab\there");
    }

    #[test]
    fn binary_is_not_text() {
        assert!(Encoding::detect_and_decode(b"\x80\x81\x82").is_none());
        assert!(Encoding::detect_and_decode(b"\xFF\xFEa").is_none());
    }

    #[test]
    fn encode_restores_bom() {
        for enc in [Encoding::Utf8, Encoding::Utf8Bom, Encoding::Utf16Le, Encoding::Utf16Be] {
            let bytes = enc.encode("a\u{3000}b");
            assert_eq!(
                Encoding::detect_and_decode(&bytes),
                Some((enc, "a\u{3000}b".to_owned()))
            );
        }
    }

    #[test]
    fn eol_detection() {
        assert_eq!(EolMode::detect("a\r\nb\r\nc\n"), EolMode::Crlf);
        assert_eq!(EolMode::detect("a\nb\nc\r\n"), EolMode::Lf);
        assert_eq!(EolMode::detect("a\rb\r"), EolMode::Cr);
        assert_eq!(EolMode::detect("no newlines"), EolMode::Lf);
    }
}
