//! Plain-text rendering of `html_instructions`.
//!
//! The API marks up turn instructions with inline tags (`<b>`, `<wbr/>`) and
//! block tags (`<div>`, `<br>`) for secondary notes such as "Destination will
//! be on the right". Inline tags are dropped, block tags split the text into
//! separate lines, and HTML entities are decoded.

/// Tags whose opening or closing form starts a new line.
const BREAK_TAGS: [&str; 5] = ["br", "div", "p", "li", "tr"];
/// Longest entity body we try to decode (`&#x10FFFF;` is 10 bytes).
const MAX_ENTITY_LEN: usize = 10;

/// Strip markup from one instruction, returning its non-empty lines.
///
/// Whitespace runs collapse to a single space and lines are trimmed. A `<`
/// that is never closed is kept as text; any complete tag that is not a
/// line-break tag is removed.
pub fn strip_instruction_markup(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => match markup_len(rest) {
                Some(len) => {
                    if is_break_tag(&rest[1..len - 1]) {
                        flush_line(&mut current, &mut lines);
                    }
                    rest = &rest[len..];
                }
                None => {
                    current.push('<');
                    rest = &rest[1..];
                }
            },
            '&' => match decode_entity(rest) {
                Some((decoded, consumed)) => {
                    current.extend(decoded);
                    rest = &rest[consumed..];
                }
                None => {
                    current.push('&');
                    rest = &rest[1..];
                }
            },
            other => {
                current.push(other);
                rest = &rest[other.len_utf8()..];
            }
        }
    }
    flush_line(&mut current, &mut lines);
    lines
}

/// Byte length of the comment or tag at the start of `input` (which begins
/// with `<`), including the closing `>`. A `>` inside a quoted attribute value
/// does not end the tag. `None` when the markup is never closed.
fn markup_len(input: &str) -> Option<usize> {
    if let Some(body) = input.strip_prefix("<!--") {
        return body.find("-->").map(|end| "<!--".len() + end + "-->".len());
    }

    let mut quote = None;
    for (idx, byte) in input.bytes().enumerate().skip(1) {
        match (quote, byte) {
            (Some(open), _) if byte == open => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(byte),
            (None, b'>') => return Some(idx + 1),
            (None, _) => {}
        }
    }
    None
}

fn is_break_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start()
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    BREAK_TAGS.contains(&name.as_str())
}

/// Decode the entity at the start of `input` (which begins with `&`).
/// Returns the character, if it is printable, and the number of bytes
/// consumed. Control characters other than whitespace are dropped.
fn decode_entity(input: &str) -> Option<(Option<char>, usize)> {
    let window = &input.as_bytes()[..input.len().min(MAX_ENTITY_LEN + 2)];
    let semi = window.iter().position(|&b| b == b';')?;
    let body = &input[1..semi];

    let decoded = match body {
        "nbsp" => ' ',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => numeric_entity(body.strip_prefix('#')?)?,
    };
    let printable = !decoded.is_control() || decoded.is_whitespace();
    Some((printable.then_some(decoded), semi + 1))
}

/// `#NNN` / `#xHH` bodies, digits only (no sign, no blanks).
fn numeric_entity(numeric: &str) -> Option<char> {
    let (digits, radix) = match numeric.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (numeric, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    char::from_u32(u32::from_str_radix(digits, radix).ok()?)
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}
