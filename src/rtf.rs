//! Plain text to RTF conversion.
//!
//! Installer dialogs (the license agreement page in particular) expect rich
//! text. [`from_plain_text`] wraps plain text into a minimal RTF 1 document
//! using ANSI code page 1250 and a single Helvetica font.
//!
//! The conversion is not idempotent: feeding its own output back in escapes
//! the control words a second time. Always convert from the original text.

/// Opening of every generated RTF document.
pub const RTF_HEADER: &str = r"{\rtf1\ansi\ansicpg1250\deff0{\fonttbl\f0\fswiss Helvetica;}\f0\fs18\pard ";

/// Closing of every generated RTF document.
pub const RTF_FOOTER: &str = " }";

const PARAGRAPH_BREAK: &str = "\\par\r\n";
const PARAGRAPH_BREAK_WITH_GAP: &str = "\\par\\par\r\n";

/// Converts plain text into an RTF document.
///
/// Backslashes and curly braces are escaped first, then every newline becomes
/// a paragraph break. With `empty_line_between_paragraphs` each break is
/// doubled so paragraphs are visually separated. Empty input yields an empty
/// string, not an empty document.
pub fn from_plain_text(plain: &str, empty_line_between_paragraphs: bool) -> String {
    if plain.is_empty() {
        return String::new();
    }

    let brk = if empty_line_between_paragraphs {
        PARAGRAPH_BREAK_WITH_GAP
    } else {
        PARAGRAPH_BREAK
    };

    let mut out = String::with_capacity(RTF_HEADER.len() + plain.len() * 2 + RTF_FOOTER.len());
    out.push_str(RTF_HEADER);
    for c in plain.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '\n' => out.push_str(brk),
            _ => out.push(c),
        }
    }
    out.push_str(RTF_FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(rtf: &str) -> &str {
        rtf.strip_prefix(RTF_HEADER)
            .and_then(|s| s.strip_suffix(RTF_FOOTER))
            .unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(from_plain_text("", false), "");
        assert_eq!(from_plain_text("", true), "");
    }

    #[test]
    fn test_plain_text_is_wrapped() {
        let rtf = from_plain_text("Hello World", false);
        assert_eq!(rtf, format!("{RTF_HEADER}Hello World{RTF_FOOTER}"));
        assert!(rtf.contains(r"\ansicpg1250"));
        assert!(rtf.contains("Helvetica"));
    }

    #[test]
    fn test_text_without_specials_is_only_wrapped() {
        let inputs = [
            "a",
            "License",
            "Copyright (c) 2024 Acme Corp. All rights reserved.",
            "tabs\tand  spaces, [brackets] <angles> & \"quotes\"",
            "Zürich, Kraków, Ελλάδα",
        ];
        for text in inputs {
            for gap in [false, true] {
                assert_eq!(
                    from_plain_text(text, gap),
                    format!("{RTF_HEADER}{text}{RTF_FOOTER}"),
                    "input {text:?}"
                );
            }
        }
    }

    #[test]
    fn test_single_paragraph_break() {
        let rtf = from_plain_text("Hello\nWorld", false);
        assert_eq!(body(&rtf), "Hello\\par\r\nWorld");
        assert_eq!(body(&rtf).matches("\\par").count(), 1);
    }

    #[test]
    fn test_doubled_paragraph_break() {
        let rtf = from_plain_text("Hello\nWorld", true);
        assert_eq!(body(&rtf), "Hello\\par\\par\r\nWorld");
        assert_eq!(body(&rtf).matches("\\par").count(), 2);
    }

    #[test]
    fn test_braces_and_backslash_escaped_once() {
        let rtf = from_plain_text(r"{a}\b", false);
        assert_eq!(body(&rtf), r"\{a\}\\b");
    }

    #[test]
    fn test_not_idempotent() {
        let once = from_plain_text("a\nb", false);
        let twice = from_plain_text(&once, false);
        assert_ne!(once, twice);
        assert!(twice.contains(r"\\par"));
    }
}
