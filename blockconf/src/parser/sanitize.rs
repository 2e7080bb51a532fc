/// Characters that carry no meaning in the grammar and are dropped before
/// structural parsing. Quotes are removed, not interpreted.
const INSIGNIFICANT: [char; 5] = [' ', '\t', '\n', '\'', '"'];

/// Source text with comments and insignificant characters removed.
///
/// Every byte of `text` remembers the offset it came from in the original
/// source, so positions found while parsing can be reported against the
/// user's file.
#[derive(Debug, Clone)]
pub struct Sanitized {
    pub text: String,
    origins: Vec<usize>,
    source_len: usize,
    /// Original offset of a `/*` that was never closed.
    pub unterminated_comment: Option<usize>,
}

impl Sanitized {
    /// Offset in the original source of the byte at `pos` in `text`.
    /// Positions at or past the end map to the end of the source.
    pub fn origin(&self, pos: usize) -> usize {
        self.origins.get(pos).copied().unwrap_or(self.source_len)
    }
}

/// Strip comments, whitespace and quotes.
pub fn sanitize(raw: &str) -> String {
    sanitize_mapped(raw).text
}

/// As [`sanitize`], keeping the offset map.
pub fn sanitize_mapped(raw: &str) -> Sanitized {
    let chars = strip_line_comments(raw);
    let (chars, unterminated_comment) = strip_block_comments(chars);

    let mut text = String::with_capacity(chars.len());
    let mut origins = Vec::with_capacity(chars.len());
    for (offset, c) in chars {
        if INSIGNIFICANT.contains(&c) {
            continue;
        }
        text.push(c);
        origins.extend((0..c.len_utf8()).map(|i| offset + i));
    }

    Sanitized {
        text,
        origins,
        source_len: raw.len(),
        unterminated_comment,
    }
}

/// Cut each line at the first `!`, `#` or `//`, whichever comes first.
fn strip_line_comments(raw: &str) -> Vec<(usize, char)> {
    let mut out = Vec::with_capacity(raw.len());
    let mut line_start = 0;
    for line in raw.split('\n') {
        let cut = [line.find('!'), line.find('#'), line.find("//")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(line.len());
        out.extend(
            line[..cut]
                .char_indices()
                .map(|(i, c)| (line_start + i, c)),
        );
        out.push((line_start + line.len(), '\n'));
        line_start += line.len() + 1;
    }
    out
}

/// Remove `/* ... */` spans. Comments do not nest: the first `*/` after an
/// opener closes it. An opener without a closer removes everything after it.
fn strip_block_comments(chars: Vec<(usize, char)>) -> (Vec<(usize, char)>, Option<usize>) {
    let mut kept: Vec<(usize, char)> = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if !starts_pair(&chars, i, '/', '*') {
            kept.push(chars[i]);
            i += 1;
            continue;
        }
        match find_pair(&chars, i + 2, '*', '/') {
            Some(close) => i = close + 2,
            None => return (kept, Some(chars[i].0)),
        }
    }
    (kept, None)
}

fn starts_pair(chars: &[(usize, char)], i: usize, first: char, second: char) -> bool {
    chars[i].1 == first && chars.get(i + 1).is_some_and(|&(_, c)| c == second)
}

fn find_pair(chars: &[(usize, char)], from: usize, first: char, second: char) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| starts_pair(chars, i, first, second))
}
