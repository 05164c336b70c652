//! JavaScript/TypeScript text helpers shared by both emitters

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]*)\}").expect("path parameter pattern is valid"));

/// Make a parameter name usable as a JavaScript identifier.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`; a leading digit gets a `_`
/// prefix. `id` stays `id`, `user-id` becomes `user_id`.
#[must_use]
pub fn ident(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Rewrite `{param}` segments to template-literal interpolation:
/// `/widgets/{id}` → `/widgets/${id}`.
#[must_use]
pub fn interpolate_path(path: &str) -> String {
    PATH_PARAM
        .replace_all(path, |caps: &Captures| format!("${{{}}}", ident(&caps[1])))
        .into_owned()
}

/// Double-quoted string literal.
#[must_use]
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_path_params() {
        assert_eq!(interpolate_path("/widgets/{id}"), "/widgets/${id}");
        assert_eq!(
            interpolate_path("/a/{a-b}/c/{c}"),
            "/a/${a_b}/c/${c}"
        );
        assert_eq!(interpolate_path("/plain"), "/plain");
    }

    #[test]
    fn idents() {
        assert_eq!(ident("id"), "id");
        assert_eq!(ident("user.id"), "user_id");
        assert_eq!(ident("2fa"), "_2fa");
        assert_eq!(ident(""), "_");
    }

    #[test]
    fn string_literals_escape() {
        assert_eq!(string_literal("ok"), "\"ok\"");
        assert_eq!(string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
    }
}
