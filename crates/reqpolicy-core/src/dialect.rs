//! Pattern dialect normalization.
//!
//! Rule patterns are written in RE2 syntax. The `regex` crate is close, but a
//! few constructs differ and would change which requests match:
//!
//! - `\d \w \s` (and negations) are ASCII-only in RE2, Unicode in `regex`.
//! - `\b \B` are ASCII word boundaries in RE2.
//! - `\Q...\E` quotes a literal in RE2; `regex` rejects it.
//! - `\<` `\>` are plain escaped punctuation in RE2, word-start/end here.
//! - inside a class, a bare `[` and `&&`/`~~` are literals in RE2 but nested
//!   classes and set operators in `regex`.
//!
//! [`normalize`] rewrites those constructs so the compiled regex matches what
//! RE2 would. Everything else (including `.` over whole characters and
//! Unicode `\p{..}` classes) passes through untouched.

/// Rewrite an RE2 pattern into equivalent `regex` crate syntax.
///
/// Malformed input is not rejected here; it is passed on so the regex
/// compiler reports the error.
pub fn normalize(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;
    let mut in_class = false;
    // first position after `[` or `[^`, where `]` is a literal
    let mut class_start = false;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            let Some(&next) = chars.get(i + 1) else {
                out.push(c);
                break;
            };
            class_start = false;

            if let Some(class) = ascii_perl_class(next) {
                out.push_str(class);
            } else if !in_class && next == 'Q' {
                let rest: String = chars[i + 2..].iter().collect();
                let (literal, consumed) = match rest.find(r"\E") {
                    Some(end) => (&rest[..end], end + 2),
                    None => (rest.as_str(), rest.len()),
                };
                out.push_str(&regex::escape(literal));
                i += 2 + rest[..consumed].chars().count();
                continue;
            } else if !in_class && next == 'b' {
                out.push_str(r"(?-u:\b)");
            } else if !in_class && next == 'B' {
                out.push_str(r"(?-u:\B)");
            } else if next == '<' || next == '>' {
                out.push(next);
            } else {
                out.push(c);
                out.push(next);
            }
            i += 2;
            continue;
        }

        if !in_class {
            out.push(c);
            if c == '[' {
                in_class = true;
                class_start = true;
                if chars.get(i + 1) == Some(&'^') {
                    out.push('^');
                    i += 1;
                }
            }
            i += 1;
            continue;
        }

        match c {
            ']' if !class_start => {
                in_class = false;
                out.push(c);
            }
            '[' if chars.get(i + 1) == Some(&':') => {
                // POSIX class, copied through to its closing `:]`
                let rest: String = chars[i..].iter().collect();
                match rest.find(":]") {
                    Some(end) => {
                        out.push_str(&rest[..end + 2]);
                        i += rest[..end + 2].chars().count();
                        class_start = false;
                        continue;
                    }
                    None => out.push_str(r"\["),
                }
            }
            '[' | '&' | '~' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
        class_start = false;
        i += 1;
    }

    out
}

/// RE2's ASCII definitions of the Perl classes, as bracket expressions that
/// are valid both inside and outside a character class.
fn ascii_perl_class(c: char) -> Option<&'static str> {
    Some(match c {
        'd' => "[0-9]",
        'D' => "[^0-9]",
        'w' => "[0-9A-Za-z_]",
        'W' => "[^0-9A-Za-z_]",
        's' => r"[\t\n\f\r ]",
        'S' => r"[^\t\n\f\r ]",
        _ => return None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::normalize;

    #[test]
    fn perl_classes_become_ascii() {
        assert_eq!(normalize(r"^/v\d+/"), "^/v[0-9]+/");
        assert_eq!(normalize(r"[\w.]"), "[[0-9A-Za-z_].]");
        assert_eq!(normalize(r"\S"), r"[^\t\n\f\r ]");
    }

    #[test]
    fn escaped_backslash_is_not_a_class() {
        assert_eq!(normalize(r"\\d"), r"\\d");
    }

    #[test]
    fn word_boundaries_become_ascii() {
        assert_eq!(normalize(r"\bid\B"), r"(?-u:\b)id(?-u:\B)");
    }

    #[test]
    fn quoted_literal_is_escaped() {
        assert_eq!(normalize(r"\Q/a.b\E$"), r"/a\.b$");
        assert_eq!(normalize(r"^\Q*+?"), r"^\*\+\?");
    }

    #[test]
    fn angle_escapes_are_literals() {
        assert_eq!(normalize(r"\<tag\>"), "<tag>");
    }

    #[test]
    fn class_literals_are_escaped() {
        assert_eq!(normalize("[[a]"), r"[\[a]");
        assert_eq!(normalize("[a&&b]"), r"[a\&\&b]");
        assert_eq!(normalize("[]a]"), "[]a]");
        assert_eq!(normalize("[^]a]"), "[^]a]");
        assert_eq!(normalize("[[:alpha:]_]"), "[[:alpha:]_]");
    }

    #[test]
    fn plain_patterns_pass_through() {
        for p in ["", "^/$", "(category|limit|sort|page)=.*", r"\p{Greek}", r"a\.b"] {
            assert_eq!(normalize(p), p);
        }
    }
}
