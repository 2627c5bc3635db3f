//! Extraction of byte arrays from generated C/C++ source text.
//!
//! Image converters for these panels emit declarations such as
//!
//! ```text
//! const unsigned char gImage_1[53856] = { /* 0X00,0X02,0X18,0X03, */
//! 0X55,0X55,0X55, ...
//! };
//! ```
//!
//! Only the declarator (`name[len] = {`) and the hex literals inside the
//! braces are interpreted; type qualifiers and comments are skipped.

use std::path::Path;

use crate::error::SourceError;

/// An array declaration found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDecl<'a> {
    pub name: &'a str,
    /// Length between the brackets, when it is a plain integer.
    pub declared_len: Option<usize>,
    /// Text between the braces, `None` if the closing brace is missing.
    body: Option<&'a str>,
}

impl ArrayDecl<'_> {
    /// Parse the hex byte literals of this array.
    ///
    /// Fails if the body is unterminated, holds no literals, holds a literal
    /// wider than a byte, or disagrees with the declared length.
    pub fn bytes(&self) -> Result<Vec<u8>, SourceError> {
        let body = self
            .body
            .ok_or_else(|| SourceError::Unterminated(self.name.to_string()))?;
        let bytes = parse_hex_literals(self.name, body)?;
        if bytes.is_empty() {
            return Err(SourceError::NoBytes(self.name.to_string()));
        }
        if let Some(declared) = self.declared_len {
            if declared != bytes.len() {
                return Err(SourceError::DeclaredLength {
                    name: self.name.to_string(),
                    declared,
                    found: bytes.len(),
                });
            }
        }
        Ok(bytes)
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Identifier ending just before `end`, ignoring whitespace in between.
fn ident_before(text: &str, end: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut stop = end;
    while stop > 0 && bytes[stop - 1].is_ascii_whitespace() {
        stop -= 1;
    }
    let mut start = stop;
    while start > 0 && is_ident_byte(bytes[start - 1]) {
        start -= 1;
    }
    if start == stop || bytes[start].is_ascii_digit() {
        return None;
    }
    Some(&text[start..stop])
}

/// End of the `//` or `/* */` comment starting at `i`, if one starts there.
/// An unterminated block comment runs to the end of the text.
fn comment_end(bytes: &[u8], i: usize) -> Option<usize> {
    match &bytes[i..] {
        [b'/', b'/', tail @ ..] => {
            Some(i + 2 + tail.iter().position(|&b| b == b'\n').unwrap_or(tail.len()))
        }
        [b'/', b'*', tail @ ..] => Some(
            tail.windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len(), |e| i + 2 + e + 2),
        ),
        _ => None,
    }
}

/// Index of the brace closing the one opened just before `start`. Braces
/// inside comments do not count.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() {
        if let Some(end) = comment_end(bytes, i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Find every `name[len] = { ... }` declaration outside comments, in source
/// order.
pub fn list_arrays(text: &str) -> Vec<ArrayDecl<'_>> {
    let bytes = text.as_bytes();
    let mut decls = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = comment_end(bytes, i) {
            i = end;
            continue;
        }
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        let open = i;
        i = open + 1;

        let Some(name) = ident_before(text, open) else {
            continue;
        };
        let Some(close) = bytes[open..].iter().position(|&b| b == b']').map(|p| open + p) else {
            break;
        };
        let declared_len = text[open + 1..close].trim().parse::<usize>().ok();

        let eq = skip_ws(bytes, close + 1);
        if bytes.get(eq) != Some(&b'=') {
            continue;
        }
        let brace = skip_ws(bytes, eq + 1);
        if bytes.get(brace) != Some(&b'{') {
            continue;
        }

        let body_start = brace + 1;
        match matching_brace(bytes, body_start) {
            Some(end) => {
                decls.push(ArrayDecl {
                    name,
                    declared_len,
                    body: Some(&text[body_start..end]),
                });
                i = end + 1;
            }
            None => {
                decls.push(ArrayDecl {
                    name,
                    declared_len,
                    body: None,
                });
                break;
            }
        }
    }
    decls
}

/// Collect the `0x..` byte literals of an initializer body, skipping
/// comments.
fn parse_hex_literals(name: &str, body: &str) -> Result<Vec<u8>, SourceError> {
    let mut out = Vec::new();
    let mut rest = body.as_bytes();
    loop {
        rest = match rest {
            [] => break,
            [b'/', b'/', tail @ ..] => {
                let nl = tail.iter().position(|&b| b == b'\n').unwrap_or(tail.len());
                &tail[nl..]
            }
            [b'/', b'*', tail @ ..] => {
                let end = tail.windows(2).position(|w| w == b"*/");
                end.map_or(&[][..], |e| &tail[e + 2..])
            }
            [b'0', b'x' | b'X', tail @ ..] => {
                let len = tail.iter().take_while(|&&b| is_ident_byte(b)).count();
                let digits = &tail[..len];
                let valid = (1..=2).contains(&len) && digits.iter().all(u8::is_ascii_hexdigit);
                if !valid {
                    return Err(SourceError::InvalidLiteral {
                        name: name.to_string(),
                        literal: format!("0x{}", String::from_utf8_lossy(digits)),
                    });
                }
                // Two ASCII hex digits always fit a byte.
                let hex = std::str::from_utf8(digits).unwrap_or("0");
                out.push(u8::from_str_radix(hex, 16).unwrap_or(0));
                &tail[len..]
            }
            [b, tail @ ..] if is_ident_byte(*b) => {
                // Skip whole tokens so digits inside identifiers are not read
                // as literal prefixes.
                let len = tail.iter().take_while(|&&b| is_ident_byte(b)).count();
                &tail[len..]
            }
            [_, tail @ ..] => tail,
        };
    }
    Ok(out)
}

/// Extract the bytes of array `name` from source text.
pub fn extract_array(text: &str, name: &str) -> Result<Vec<u8>, SourceError> {
    let decls = list_arrays(text);
    let decl = decls
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| SourceError::ArrayNotFound(name.to_string()))?;
    let bytes = decl.bytes()?;
    log::info!("parsed {name}: {} bytes", bytes.len());
    Ok(bytes)
}

/// Read a source file and extract array `name` from it.
///
/// Non-UTF-8 bytes (e.g. comments in a legacy code page) are replaced
/// rather than rejected.
pub fn read_array(path: &Path, name: &str) -> Result<Vec<u8>, SourceError> {
    let raw = std::fs::read(path)?;
    extract_array(&String::from_utf8_lossy(&raw), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
#include "imagedata.h"
#include <avr/pgmspace.h>
// gImage_0[2] = { 0XFF }; commented out
const unsigned char gImage_1[4] = { /* 0X00,0X02,0X18,0X03, */
0X1B,0XE4,0x55,0xaa,
};
const unsigned char gImage_2[ALLSCREEN_BYTES] =
{
  0X00, 0X01 // trailing comment 0X99
};
int lookup[3] = {1, 2, 3};
"#;

    #[test]
    fn extracts_named_array() {
        assert_eq!(
            extract_array(SOURCE, "gImage_1").unwrap(),
            vec![0x1B, 0xE4, 0x55, 0xAA]
        );
    }

    #[test]
    fn macro_length_is_not_checked() {
        let decls = list_arrays(SOURCE);
        let decl = decls.iter().find(|d| d.name == "gImage_2").unwrap();
        assert_eq!(decl.declared_len, None);
        assert_eq!(decl.bytes().unwrap(), vec![0x00, 0x01]);
    }

    #[test]
    fn lists_declarations_in_order() {
        let names: Vec<&str> = list_arrays(SOURCE).iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["gImage_1", "gImage_2", "lookup"]);
    }

    #[test]
    fn decimal_initializers_hold_no_bytes() {
        assert!(matches!(
            extract_array(SOURCE, "lookup"),
            Err(SourceError::NoBytes(name)) if name == "lookup"
        ));
    }

    #[test]
    fn missing_array() {
        assert!(matches!(
            extract_array(SOURCE, "gImage_3"),
            Err(SourceError::ArrayNotFound(name)) if name == "gImage_3"
        ));
    }

    #[test]
    fn name_must_match_whole_identifier() {
        assert!(extract_array(SOURCE, "Image_1").is_err());
    }

    #[test]
    fn unterminated_array() {
        let text = "const unsigned char img[2] = { 0x01, 0x02,";
        assert!(matches!(
            extract_array(text, "img"),
            Err(SourceError::Unterminated(_))
        ));
    }

    #[test]
    fn declared_length_mismatch() {
        let text = "const unsigned char img[3] = { 0x01, 0x02 };";
        match extract_array(text, "img") {
            Err(SourceError::DeclaredLength {
                declared, found, ..
            }) => assert_eq!((declared, found), (3, 2)),
            other => panic!("expected DeclaredLength, got {other:?}"),
        }
    }

    #[test]
    fn wide_literal_is_rejected() {
        let text = "const unsigned short img[1] = { 0x1234 };";
        assert!(matches!(
            extract_array(text, "img"),
            Err(SourceError::InvalidLiteral { literal, .. }) if literal == "0x1234"
        ));
    }

    #[test]
    fn commented_out_declaration_does_not_shadow() {
        let text = "// const unsigned char img[1] = { 0x00 };\n\
                    /* const unsigned char img[1] = { 0x11 }; */\n\
                    const unsigned char img[1] = { 0xFF };";
        assert_eq!(extract_array(text, "img").unwrap(), vec![0xFF]);
        assert_eq!(list_arrays(text).len(), 1);
    }

    #[test]
    fn brace_inside_comment_does_not_end_body() {
        let text = "img[2] = { /* } */ 0x01, // }\n 0x02 }";
        assert_eq!(extract_array(text, "img").unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn unterminated_comment_in_body() {
        let text = "img[1] = { 0x01 /* };";
        assert!(matches!(
            extract_array(text, "img"),
            Err(SourceError::Unterminated(_))
        ));
    }

    #[test]
    fn whitespace_around_declarator() {
        let text = "const unsigned char img [ 2 ]   =\n\t{0x0f,0XF0};";
        assert_eq!(extract_array(text, "img").unwrap(), vec![0x0F, 0xF0]);
    }

    #[test]
    fn read_array_reports_missing_file() {
        let err = read_array(Path::new("/nonexistent/imagedata.cpp"), "gImage_1").unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
