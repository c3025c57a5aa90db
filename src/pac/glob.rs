// src/pac/glob.rs
use regex::Regex;
use tracing::debug;

/// Turn a shell expression into an anchored regex.
///
/// `.` is escaped, `?` becomes `.` and `*` becomes `.*`. Every other regex
/// metacharacter is copied as-is, so `+`, `[`, `(` and friends keep their
/// regex meaning. Long-standing PAC implementations behave this way.
fn to_regex(shexp: &str) -> String {
    let mut pattern = String::with_capacity(shexp.len() + 8);
    pattern.push('^');
    for c in shexp.chars() {
        match c {
            '.' => pattern.push_str("\\."),
            '?' => pattern.push('.'),
            '*' => pattern.push_str(".*"),
            _ => pattern.push(c),
        }
    }
    pattern.push('$');
    pattern
}

/// `shExpMatch(str, shexp)`
pub fn sh_exp_match(s: &str, shexp: &str) -> bool {
    match Regex::new(&to_regex(shexp)) {
        Ok(re) => re.is_match(s),
        Err(e) => {
            debug!("shExpMatch: cannot compile {:?}: {}", shexp, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn translation() {
        assert_eq!(to_regex("*.example.com"), "^.*\\.example\\.com$");
        assert_eq!(to_regex("host?"), "^host.$");
    }

    #[rstest]
    #[case("www.example.com", "*.example.com", true)]
    #[case("example.com", "*.example.com", false)]
    #[case("a.b.example.com", "*.example.com", true)]
    #[case("wwwxexample.com", "www.example.com", false)]
    #[case("http://home.netscape.com/people/ari/index.html", "*/ari/*", true)]
    #[case("http://home.netscape.com/people/montulli/index.html", "*/ari/*", false)]
    #[case("host1", "host?", true)]
    #[case("host", "host?", false)]
    #[case("host12", "host?", false)]
    #[case("", "*", true)]
    #[case("anything", "*", true)]
    #[case("abc", "", false)]
    #[case("www.example.com.evil", "*.example.com", false)]
    fn glob_matches(#[case] s: &str, #[case] shexp: &str, #[case] expected: bool) {
        assert_eq!(sh_exp_match(s, shexp), expected, "{s} ~ {shexp}");
    }

    // Regex metacharacters other than `.`, `?` and `*` are not escaped.
    #[rstest]
    #[case("aaa", "a+", true)]
    #[case("a+", "a+", false)]
    #[case("host7", "host[0-9]", true)]
    #[case("foo", "foo|bar", true)]
    #[case("bar", "foo|bar", true)]
    fn metacharacters_keep_regex_meaning(
        #[case] s: &str,
        #[case] shexp: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(sh_exp_match(s, shexp), expected, "{s} ~ {shexp}");
    }

    #[rstest]
    #[case("(")]
    #[case("[a-")]
    #[case("a{2")]
    fn malformed_expression_is_false(#[case] shexp: &str) {
        assert!(!sh_exp_match("(", shexp));
        assert!(!sh_exp_match("anything", shexp));
    }
}
