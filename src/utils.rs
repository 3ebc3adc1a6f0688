use unicode_width::UnicodeWidthStr;

/// Cuts `s` to at most `max_width` display columns, ending with `...` when cut.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Collapses newlines and whitespace runs so a question fits on one list row.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Inserts at a cursor counted in characters; returns the new cursor.
pub fn insert_char(buffer: &mut String, cursor: usize, c: char) -> usize {
    let cursor = cursor.min(buffer.chars().count());
    buffer.insert(byte_index(buffer, cursor), c);
    cursor + 1
}

/// Deletes the character before the cursor; returns the new cursor.
pub fn remove_char_before(buffer: &mut String, cursor: usize) -> usize {
    let cursor = cursor.min(buffer.chars().count());
    if cursor == 0 {
        return 0;
    }
    buffer.remove(byte_index(buffer, cursor - 1));
    cursor - 1
}
