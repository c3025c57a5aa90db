// src/pac/dns.rs
//! Name resolution and netmask matching.
//!
//! Only IPv4 exists here. A name that resolves to IPv6 addresses alone is
//! treated the same as a name that does not resolve at all.

use crate::context::PacContext;
use crate::error::{PacError, Result};
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

/// Parse `host` as an IPv4 literal, otherwise take the first IPv4 answer of a
/// forward lookup.
pub fn resolve(ctx: &PacContext, host: &str) -> Result<Ipv4Addr> {
    if host.is_empty() {
        return Err(PacError::resolution(host, "empty host"));
    }
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    let addrs = ctx
        .lookup_host(host)
        .map_err(|e| PacError::resolution(host, e))?;

    addrs
        .into_iter()
        .find_map(|addr| match addr {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| PacError::resolution(host, "no IPv4 address"))
}

/// `isResolvable(host)`
pub fn is_resolvable(ctx: &PacContext, host: &str) -> bool {
    match resolve(ctx, host) {
        Ok(_) => true,
        Err(e) => {
            debug!("isResolvable: {}", e);
            false
        }
    }
}

/// `dnsResolve(host)`: dotted quad, or `""` when the name does not resolve.
pub fn dns_resolve(ctx: &PacContext, host: &str) -> String {
    match resolve(ctx, host) {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            debug!("dnsResolve: {}", e);
            String::new()
        }
    }
}

/// `isInNet(host, pattern, mask)`: `resolve(host) & mask == pattern`.
///
/// The pattern is compared as written, it is not masked first, so
/// `isInNet(h, "10.0.0.1", "255.0.0.0")` never matches.
pub fn is_in_net(ctx: &PacContext, host: &str, pattern: &str, mask: &str) -> bool {
    let address = match resolve(ctx, host) {
        Ok(ip) => ip,
        Err(e) => {
            debug!("isInNet: {}", e);
            return false;
        }
    };
    let Ok(mask) = mask.parse::<Ipv4Addr>() else {
        debug!("isInNet: mask {:?} is not an IPv4 address", mask);
        return false;
    };
    let Ok(pattern) = pattern.parse::<Ipv4Addr>() else {
        debug!("isInNet: pattern {:?} is not an IPv4 address", pattern);
        return false;
    };

    u32::from(address) & u32::from(mask) == u32::from(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticResolver;
    use rstest::rstest;

    fn ctx() -> PacContext {
        let resolver = StaticResolver::new()
            .with_record("intranet.corp", &["10.20.30.40".parse().unwrap()])
            .with_record(
                "dual.example",
                &["2001:db8::1".parse().unwrap(), "93.184.216.34".parse().unwrap()],
            )
            .with_record("v6only.example", &["2001:db8::2".parse().unwrap()])
            .with_record("empty.example", &[]);
        PacContext::system().with_resolver(resolver)
    }

    #[rstest]
    #[case("192.168.1.5")]
    #[case("0.0.0.0")]
    #[case("255.255.255.255")]
    #[case("10.0.0.1")]
    fn literal_resolves_to_itself(#[case] ip: &str) {
        assert_eq!(resolve(&ctx(), ip).unwrap().to_string(), ip);
        assert_eq!(dns_resolve(&ctx(), ip), ip);
    }

    #[test]
    fn lookup_picks_first_ipv4_answer() {
        assert_eq!(
            resolve(&ctx(), "dual.example").unwrap(),
            Ipv4Addr::new(93, 184, 216, 34)
        );
        assert_eq!(dns_resolve(&ctx(), "intranet.corp"), "10.20.30.40");
    }

    #[rstest]
    #[case("")]
    #[case("v6only.example")]
    #[case("empty.example")]
    #[case("unknown.example")]
    #[case("::1")]
    fn failures(#[case] host: &str) {
        let ctx = ctx();
        assert!(matches!(
            resolve(&ctx, host),
            Err(PacError::Resolution { .. })
        ));
        assert!(!is_resolvable(&ctx, host));
        assert_eq!(dns_resolve(&ctx, host), "");
    }

    #[test]
    fn resolvable_names() {
        assert!(is_resolvable(&ctx(), "intranet.corp"));
        assert!(is_resolvable(&ctx(), "127.0.0.1"));
    }

    #[rstest]
    #[case("192.168.1.5", "192.168.1.0", "255.255.255.0", true)]
    #[case("192.168.2.5", "192.168.1.0", "255.255.255.0", false)]
    #[case("intranet.corp", "10.0.0.0", "255.0.0.0", true)]
    #[case("intranet.corp", "10.20.0.0", "255.255.0.0", true)]
    #[case("intranet.corp", "10.21.0.0", "255.255.0.0", false)]
    #[case("10.1.2.3", "10.0.0.1", "255.0.0.0", false)]
    #[case("10.1.2.3", "0.0.0.0", "0.0.0.0", true)]
    #[case("10.1.2.3", "10.1.2.3", "255.255.255.255", true)]
    fn in_net(
        #[case] host: &str,
        #[case] pattern: &str,
        #[case] mask: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_in_net(&ctx(), host, pattern, mask), expected);
    }

    #[rstest]
    #[case("unknown.example", "10.0.0.0", "255.0.0.0")]
    #[case("v6only.example", "0.0.0.0", "0.0.0.0")]
    #[case("", "0.0.0.0", "0.0.0.0")]
    #[case("10.1.2.3", "10.0.0.0", "255.0.0")]
    #[case("10.1.2.3", "10.0.0.0", "ffff::")]
    #[case("10.1.2.3", "10.0.0", "255.0.0.0")]
    #[case("10.1.2.3", "", "255.0.0.0")]
    fn in_net_failures_are_false(#[case] host: &str, #[case] pattern: &str, #[case] mask: &str) {
        assert!(!is_in_net(&ctx(), host, pattern, mask));
    }
}
