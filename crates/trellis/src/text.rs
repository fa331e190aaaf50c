//! Width measurement and terminal-safe encoding.
//!
//! All sizing in this crate is done in display cells, never bytes. Width
//! comes from `unicode-width`; the encoders here keep control bytes from
//! reaching the terminal (`\xHH` hex escapes) and produce the quoting used
//! by the raw and export output formats.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal cells.
pub(crate) fn display_width(s: &str) -> usize {
    s.width()
}

/// Longest prefix of `s` that fits in `cells` display cells.
///
/// Returns the byte length of the prefix and its actual width. The cut is
/// always on a character boundary; a wide character that would straddle the
/// limit is excluded entirely.
pub(crate) fn truncate_to_cells(s: &str, cells: usize) -> (usize, usize) {
    let mut width = 0;
    let mut bytes = 0;
    for (i, c) in s.char_indices() {
        let cw = c.width().unwrap_or(0);
        if width + cw > cells {
            break;
        }
        width += cw;
        bytes = i + c.len_utf8();
    }
    (bytes, width)
}

fn push_hex_escaped(out: &mut String, c: char) {
    let mut utf8 = [0u8; 4];
    for b in c.encode_utf8(&mut utf8).bytes() {
        out.push_str(&format!("\\x{:02x}", b));
    }
}

/// Replace control characters with `\xHH` escapes.
///
/// Characters listed in `allowed` pass through unescaped; columns use this
/// to let deliberate newlines or tabs survive in their cells.
pub(crate) fn safe_encode(s: &str, allowed: &str) -> String {
    if !s.chars().any(|c| c.is_control() && !allowed.contains(c)) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_control() && !allowed.contains(c) {
            push_hex_escaped(&mut out, c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Raw-format encoding: blanks, control characters, and backslashes become
/// `\xHH` escapes so the output splits unambiguously on whitespace.
pub(crate) fn encode_nonblank(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == ' ' || c == '\t' || c == '\\' || c.is_control() {
            push_hex_escaped(&mut out, c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Export-format value quoting: double quotes around the value, with `"`,
/// `\`, `$`, and backticks backslash-escaped and control characters
/// hex-escaped, so the output can be sourced by a shell.
pub(crate) fn quote_export(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' | '\\' | '$' | '`' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => push_hex_escaped(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Make a column name usable as a shell variable: anything outside
/// `[A-Za-z0-9_]` becomes `_`, and a leading digit gets an underscore prefix.
pub(crate) fn shell_var_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for (i, c) in name.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            out.push('_');
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}
