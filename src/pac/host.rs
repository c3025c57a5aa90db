// src/pac/host.rs
//! Host name classification. Pure string tests, no DNS involved.

/// `isPlainHostName(host)`: the host has no domain part.
pub fn is_plain_host_name(host: &str) -> bool {
    !host.contains('.')
}

/// `dnsDomainIs(host, domain)`: literal suffix test.
///
/// There is no label-boundary check, so `"ahost.com"` is in `"host.com"`.
/// Scripts rely on that.
pub fn dns_domain_is(host: &str, domain: &str) -> bool {
    host.len() >= domain.len() && host.ends_with(domain)
}

/// `localHostOrDomainIs(host, hostdom)`: exact match, or `host` is the
/// unqualified first label of `hostdom`.
pub fn local_host_or_domain_is(host: &str, hostdom: &str) -> bool {
    if host == hostdom {
        return true;
    }
    hostdom
        .strip_prefix(host)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// `dnsDomainLevels(host)`: number of dots.
pub fn dns_domain_levels(host: &str) -> usize {
    host.matches('.').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("www", true)]
    #[case("localhost", true)]
    #[case("", true)]
    #[case("www.example.com", false)]
    #[case("example.", false)]
    #[case(".", false)]
    fn plain_host_name(#[case] host: &str, #[case] expected: bool) {
        assert_eq!(is_plain_host_name(host), expected, "{host}");
    }

    #[rstest]
    #[case("www.example.com", "example.com", true)]
    #[case("www.example.com", ".example.com", true)]
    #[case("example.com", "example.com", true)]
    #[case("example.com", "www.example.com", false)]
    #[case("ahost.com", "host.com", true)]
    #[case("www.example.org", "example.com", false)]
    #[case("WWW.EXAMPLE.COM", "example.com", false)]
    #[case("anything", "", true)]
    fn domain_is(#[case] host: &str, #[case] domain: &str, #[case] expected: bool) {
        assert_eq!(dns_domain_is(host, domain), expected, "{host} in {domain}");
    }

    #[rstest]
    #[case("www", "www.example.com", true)]
    #[case("www.example.com", "www.example.com", true)]
    #[case("www.example.com", "www", false)]
    #[case("home", "www.example.com", false)]
    #[case("www.example", "www.example.com", true)]
    #[case("ww", "www.example.com", false)]
    fn local_host_or_domain(#[case] host: &str, #[case] hostdom: &str, #[case] expected: bool) {
        assert_eq!(local_host_or_domain_is(host, hostdom), expected, "{host} ~ {hostdom}");
    }

    #[rstest]
    #[case("a", 0)]
    #[case("a.b", 1)]
    #[case("a.b.c", 2)]
    #[case("www.example.com.", 3)]
    #[case("", 0)]
    fn domain_levels(#[case] host: &str, #[case] expected: usize) {
        assert_eq!(dns_domain_levels(host), expected);
    }
}
