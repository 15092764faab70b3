//! Greedy word wrapping.
//!
//! A visual line grows one space-delimited word at a time until the next word would
//! overflow. The fitted part is drawn and the rest is carried to the next line. A first
//! word wider than the limit is drawn on its own rather than stalling the layout.

/// Result of fitting text into one visual line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit<'a> {
    /// Text to draw on this line, trailing spaces trimmed when wrapped.
    pub line: &'a str,
    /// Text carried to the next line, `None` when everything fit.
    pub remainder: Option<&'a str>,
    /// Measured width of `line`.
    pub width: f32,
}

impl<'a> LineFit<'a> {
    /// True when text was carried over.
    pub fn wrapped(&self) -> bool {
        self.remainder.is_some()
    }

    /// Number of space characters inside the drawn line.
    pub fn spaces(&self) -> usize {
        self.line.bytes().filter(|b| *b == b' ').count()
    }
}

/// Split at the first CR, LF or CRLF, consuming the break.
///
/// # Examples
///
/// ```
/// use pdf_scribe::layout::split_at_line_break;
///
/// assert_eq!(split_at_line_break("a\r\nb"), Some(("a", "b")));
/// assert_eq!(split_at_line_break("a\n\rb"), Some(("a", "\rb")));
/// assert_eq!(split_at_line_break("ab"), None);
/// ```
pub fn split_at_line_break(text: &str) -> Option<(&str, &str)> {
    let idx = text.find(|c| c == '\r' || c == '\n')?;
    let bytes = text.as_bytes();
    let len = if bytes[idx] == b'\r' && bytes.get(idx + 1) == Some(&b'\n') {
        2
    } else {
        1
    };
    Some((&text[..idx], &text[idx + len..]))
}

/// Fit as many words of `text` as possible into `max_width`.
///
/// `measure` returns the rendered width of a candidate. Text without spaces is never
/// wrapped.
pub fn fit_line<'a, F>(text: &'a str, max_width: f32, measure: F) -> LineFit<'a>
where
    F: Fn(&str) -> f32,
{
    let whole = |text: &'a str| LineFit {
        line: text,
        remainder: None,
        width: measure(text),
    };

    let Some(mut fitted_end) = text.find(' ') else {
        return whole(text);
    };
    let mut fitted_width = measure(text[..fitted_end].trim_end());

    loop {
        let next_space = text[fitted_end + 1..]
            .find(' ')
            .map(|pos| pos + fitted_end + 1);
        let candidate = match next_space {
            Some(end) => &text[..end],
            None => text,
        };
        let width = measure(candidate.trim_end());
        if width > max_width {
            return LineFit {
                line: text[..fitted_end].trim_end(),
                remainder: Some(&text[fitted_end + 1..]),
                width: fitted_width,
            };
        }
        match next_space {
            Some(end) => {
                fitted_end = end;
                fitted_width = width;
            },
            None => return whole(text),
        }
    }
}

/// Extra width per space that stretches a wrapped line to `max_width`.
///
/// `None` for lines that were not wrapped or have no space to widen.
pub fn justify_spacing(fit: &LineFit<'_>, max_width: f32) -> Option<f32> {
    let spaces = fit.spaces();
    if !fit.wrapped() || spaces == 0 {
        return None;
    }
    Some((max_width - fit.width) / spaces as f32)
}
