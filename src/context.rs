// src/context.rs
//! Read-only ambient facts the PAC primitives consult: the clock, name
//! resolution, the process environment and the network interface table.
//!
//! Each fact sits behind a small trait so that evaluation can be pinned to a
//! fixed moment, a canned DNS answer or a fake set of interfaces.

use crate::interface::{InterfaceTable, SystemInterfaces};
use chrono::{DateTime, FixedOffset, Local};
use std::collections::HashMap;
use std::env;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::Arc;

/// Environment variable that overrides `myIpAddress()`.
///
/// Its value is either an IPv4 literal or the name of a network interface.
pub const MY_IP_ADDRESS_ENV: &str = "PAC_MYIPADDRESS";

pub trait Clock: Send + Sync {
    /// Current instant, carrying the local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

pub trait Resolver: Send + Sync {
    /// Forward lookup of `host`. May return addresses of either family.
    fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Blocking lookup through the system resolver (`getaddrinfo`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = (host, 0).to_socket_addrs()?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolver answering from a fixed table; unknown names fail.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    records: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, host: &str, addrs: &[IpAddr]) -> Self {
        self.records.insert(host.to_string(), addrs.to_vec());
        self
    }
}

impl Resolver for StaticResolver {
    fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        self.records.get(host).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such host: {}", host))
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

#[derive(Debug, Default, Clone)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl Environment for StaticEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// The ambient state handed to every primitive.
///
/// Cloning is cheap; all providers are shared.
#[derive(Clone)]
pub struct PacContext {
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) resolver: Arc<dyn Resolver>,
    pub(crate) interfaces: Arc<dyn InterfaceTable>,
    pub(crate) environment: Arc<dyn Environment>,
    pub(crate) override_var: String,
}

impl PacContext {
    /// Context backed by the real clock, DNS, interfaces and environment.
    pub fn system() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            resolver: Arc::new(SystemResolver),
            interfaces: Arc::new(SystemInterfaces),
            environment: Arc::new(SystemEnvironment),
            override_var: MY_IP_ADDRESS_ENV.to_string(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_interfaces(mut self, interfaces: impl InterfaceTable + 'static) -> Self {
        self.interfaces = Arc::new(interfaces);
        self
    }

    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Arc::new(environment);
        self
    }

    /// Read the `myIpAddress()` override from `name` instead of
    /// [`MY_IP_ADDRESS_ENV`].
    pub fn with_override_var(mut self, name: &str) -> Self {
        self.override_var = name.to_string();
        self
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn lookup_host(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        self.resolver.lookup_host(host)
    }

    pub fn interface_table(&self) -> &dyn InterfaceTable {
        self.interfaces.as_ref()
    }

    /// Value of the `myIpAddress()` override variable, if set.
    pub fn ip_override(&self) -> Option<String> {
        self.environment.var(&self.override_var)
    }
}

impl Default for PacContext {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for PacContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacContext")
            .field("override_var", &self.override_var)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn static_resolver_answers_known_names_only() {
        let resolver = StaticResolver::new()
            .with_record("proxy.corp", &[IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8))]);

        assert_eq!(
            resolver.lookup_host("proxy.corp").unwrap(),
            vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 8))]
        );
        assert!(resolver.lookup_host("other.corp").is_err());
    }

    #[test]
    fn override_var_name_is_configurable() {
        let env = StaticEnvironment::new()
            .with_var(MY_IP_ADDRESS_ENV, "10.1.1.1")
            .with_var("CUSTOM_IP", "10.2.2.2");

        let ctx = PacContext::system().with_environment(env.clone());
        assert_eq!(ctx.ip_override().as_deref(), Some("10.1.1.1"));

        let ctx = PacContext::system()
            .with_environment(env)
            .with_override_var("CUSTOM_IP");
        assert_eq!(ctx.ip_override().as_deref(), Some("10.2.2.2"));
    }

    #[test]
    fn fixed_clock_never_moves() {
        let at = DateTime::parse_from_rfc3339("2024-03-15T10:30:00+08:00").unwrap();
        let ctx = PacContext::system().with_clock(FixedClock(at));
        assert_eq!(ctx.now(), at);
        assert_eq!(ctx.now(), ctx.now());
    }
}
