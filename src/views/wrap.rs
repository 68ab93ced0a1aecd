/// Characters per line on the description screen.
pub const LINE_WIDTH: usize = 18;
/// Lines on the description screen.
pub const LINE_COUNT: usize = 4;

/// Greedy word wrap into exactly `lines` segments of at most `width` chars.
///
/// Each cut backs off to just after the nearest preceding space so no word is
/// split. Segments keep their trailing space; once the text runs out the
/// remaining segments are empty. A window with no space at all (one very
/// long token) is hard-cut at `width`.
pub fn wrap_text(text: &str, width: usize, lines: usize) -> Vec<String> {
    let mut chars: Vec<char> = text.chars().collect();
    chars.push(' ');
    let len = chars.len();
    let width = width.max(1);

    let mut out = Vec::with_capacity(lines);
    let mut start = 0;
    for _ in 0..lines {
        let hard = start + width;
        let end = if hard >= len {
            len
        } else {
            (start + 1..=hard)
                .rev()
                .find(|&cut| chars[cut - 1] == ' ')
                .unwrap_or(hard)
        };
        out.push(chars[start..end].iter().collect());
        start = end;
    }
    out
}
