// src/pac/mod.rs
pub mod dns;
pub mod engine;
pub mod glob;
pub mod host;
pub mod local;
pub mod temporal;

pub use engine::{find_proxy_for_url, register_pac_functions, PacScript};
pub use temporal::{DateShape, TemporalArg, TimeShape, Token};

use crate::context::PacContext;
use crate::error::Result;
use std::net::Ipv4Addr;

/// The PAC host primitives bound to one ambient context.
///
/// Method names follow the Netscape functions they implement
/// (`is_in_net` is `isInNet`, and so on). The object holds no mutable state
/// and can be shared between threads evaluating scripts concurrently.
#[derive(Debug, Clone, Default)]
pub struct PacFunctions {
    ctx: PacContext,
}

impl PacFunctions {
    pub fn new(ctx: PacContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &PacContext {
        &self.ctx
    }

    pub fn is_plain_host_name(&self, host: &str) -> bool {
        host::is_plain_host_name(host)
    }

    pub fn dns_domain_is(&self, host: &str, domain: &str) -> bool {
        host::dns_domain_is(host, domain)
    }

    pub fn local_host_or_domain_is(&self, host: &str, hostdom: &str) -> bool {
        host::local_host_or_domain_is(host, hostdom)
    }

    pub fn dns_domain_levels(&self, host: &str) -> usize {
        host::dns_domain_levels(host)
    }

    pub fn resolve(&self, host: &str) -> Result<Ipv4Addr> {
        dns::resolve(&self.ctx, host)
    }

    pub fn is_resolvable(&self, host: &str) -> bool {
        dns::is_resolvable(&self.ctx, host)
    }

    pub fn dns_resolve(&self, host: &str) -> String {
        dns::dns_resolve(&self.ctx, host)
    }

    pub fn is_in_net(&self, host: &str, pattern: &str, mask: &str) -> bool {
        dns::is_in_net(&self.ctx, host, pattern, mask)
    }

    pub fn my_ip_address(&self) -> Option<Ipv4Addr> {
        local::my_ip_address(&self.ctx)
    }

    pub fn sh_exp_match(&self, s: &str, shexp: &str) -> bool {
        glob::sh_exp_match(s, shexp)
    }

    pub fn weekday_range(&self, args: &[TemporalArg]) -> bool {
        temporal::weekday_range(&self.ctx, args)
    }

    pub fn date_range(&self, args: &[TemporalArg]) -> bool {
        temporal::date_range(&self.ctx, args)
    }

    pub fn time_range(&self, args: &[TemporalArg]) -> Result<bool> {
        temporal::time_range(&self.ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FixedClock, StaticEnvironment, StaticResolver};
    use crate::interface::{Interface, StaticInterfaces};
    use chrono::DateTime;

    fn functions() -> PacFunctions {
        let now = DateTime::parse_from_rfc3339("2024-03-13T14:00:00+00:00").unwrap();
        let ctx = PacContext::system()
            .with_clock(FixedClock(now))
            .with_resolver(
                StaticResolver::new()
                    .with_record("www.example.com", &["93.184.216.34".parse().unwrap()]),
            )
            .with_interfaces(StaticInterfaces(vec![Interface::new(
                "eth0",
                &["192.168.1.20".parse().unwrap()],
            )]))
            .with_environment(StaticEnvironment::new());
        PacFunctions::new(ctx)
    }

    #[test]
    fn capability_surface() {
        let pac = functions();

        assert!(pac.is_plain_host_name("intranet"));
        assert!(pac.dns_domain_is("www.example.com", "example.com"));
        assert!(pac.local_host_or_domain_is("www", "www.example.com"));
        assert_eq!(pac.dns_domain_levels("www.example.com"), 2);
        assert_eq!(
            pac.resolve("www.example.com").unwrap(),
            Ipv4Addr::new(93, 184, 216, 34)
        );
        assert!(pac.is_resolvable("www.example.com"));
        assert_eq!(pac.dns_resolve("www.example.com"), "93.184.216.34");
        assert!(pac.is_in_net("www.example.com", "93.184.0.0", "255.255.0.0"));
        assert_eq!(pac.my_ip_address(), Some(Ipv4Addr::new(192, 168, 1, 20)));
        assert!(pac.sh_exp_match("www.example.com", "*.example.com"));
        assert!(pac.weekday_range(&["MON".into(), "FRI".into()]));
        assert!(pac.date_range(&["MAR".into()]));
        assert!(pac.time_range(&[9.into(), 17.into()]).unwrap());
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PacFunctions>();
    }
}
