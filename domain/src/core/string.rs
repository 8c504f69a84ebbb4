//! String utilities for the domain layer.

/// Shorten text for log lines and progress messages (UTF-8 safe)
///
/// Newlines are flattened to spaces so a preview always fits on one line.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.len() <= max_len {
        return flat;
    }
    let target = max_len.saturating_sub(3);
    let mut end = target.min(flat.len());
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}

/// Title-case a backend or model identifier for display
///
/// `"llama3.1"` becomes `"Llama3.1"`, `"gpt-4o-mini"` becomes `"Gpt-4o-Mini"`.
pub fn title_case(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut at_word_start = true;
    for c in id.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric() && c != '.';
    }
    out
}
