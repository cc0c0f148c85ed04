//! Text clean-up for values embedded as XML element text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::non_std_lazy_statics, clippy::expect_used)]
static ENTITY_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:amp|lt|gt|quot|apos|#[0-9]+|#[xX][0-9A-Fa-f]+);")
        .expect("entity reference pattern")
});
#[allow(clippy::non_std_lazy_statics, clippy::expect_used)]
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(" {2,}").expect("space run pattern"));
#[allow(clippy::non_std_lazy_statics, clippy::expect_used)]
static EQUALS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("=+").expect("equals run pattern"));

/// Normalise a value for element text.
///
/// Steps, in order:
/// 1. escape `&`, `<` and `>` (entity references already present are kept)
/// 2. drop newline characters
/// 3. collapse runs of spaces to one space
/// 4. replace runs of `=` with a single `:`
///
/// `sanitize(&sanitize(t)) == sanitize(t)` for every input.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let escaped = escape_text(text);
    let flattened: String = escaped
        .chars()
        .filter(|ch| !matches!(ch, '\n' | '\r'))
        .collect();
    let collapsed = SPACE_RUN.replace_all(&flattened, " ");
    EQUALS_RUN.replace_all(&collapsed, ":").into_owned()
}

/// Escape the characters that are unsafe in element text. An `&` that
/// already starts an XML entity reference is left alone.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for (idx, ch) in text.char_indices() {
        match ch {
            '&' if is_entity_ref(&text[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn is_entity_ref(rest: &str) -> bool {
    ENTITY_REF.is_match(rest)
}
