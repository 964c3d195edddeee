//! Small pure text helpers for untrusted strings shown in the terminal.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{9b}';

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

/// Strip escape sequences and control characters from text that came over
/// the network before it is placed in a terminal cell.
///
/// Handles CSI (`ESC [` and C1 `U+009B`), OSC (ended by BEL or ST), and
/// DCS/PM/APC strings (ended by ST). Newlines and tabs become spaces; every
/// view renders single-line cells.
#[must_use]
pub fn display_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(char::is_control) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            C1_CSI => skip_csi(&mut chars),
            '\n' | '\t' | '\r' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn skip_escape(chars: &mut Chars<'_>) {
    let Some(&kind) = chars.peek() else {
        return;
    };
    match kind {
        '[' => {
            chars.next();
            skip_csi(chars);
        }
        ']' => {
            chars.next();
            skip_string(chars, true);
        }
        'P' | '^' | '_' => {
            chars.next();
            skip_string(chars, false);
        }
        // charset and line attribute selectors take one argument
        '(' | ')' | '*' | '+' | '#' | ' ' => {
            chars.next();
            chars.next();
        }
        c if c.is_control() => {}
        _ => {
            chars.next();
        }
    }
}

/// Parameter and intermediate bytes up to and including the final byte.
fn skip_csi(chars: &mut Chars<'_>) {
    while let Some(&c) = chars.peek() {
        match c {
            '\x20'..='\x3f' => {
                chars.next();
            }
            '\x40'..='\x7e' => {
                chars.next();
                return;
            }
            _ => return,
        }
    }
}

/// Consume a control string through its ST (`ESC \`), or BEL when allowed.
fn skip_string(chars: &mut Chars<'_>, bel_ends: bool) {
    while let Some(c) = chars.next() {
        if c == BEL && bel_ends {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}

/// Truncate to at most `max` characters, ending in `...` when shortened.
#[must_use]
pub fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    let raw = raw.trim();
    let max = max.max(3);
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    let head: String = raw.chars().take(max - 3).collect();
    format!("{head}...")
}
