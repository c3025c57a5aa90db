// src/pac/local.rs
use crate::context::PacContext;
use std::net::Ipv4Addr;
use tracing::{debug, warn};

/// `myIpAddress()`
///
/// Lookup order:
/// 1. the override variable, when it holds an IPv4 literal;
/// 2. the override variable as an interface name: that interface's first
///    non-loopback, non-link-local IPv4 address;
/// 3. the *last* such address across all interfaces.
///
/// `None` means no usable address; the script sees `undefined`.
pub fn my_ip_address(ctx: &PacContext) -> Option<Ipv4Addr> {
    if let Some(value) = ctx.ip_override() {
        if let Ok(ip) = value.parse::<Ipv4Addr>() {
            debug!("myIpAddress: using override address {}", ip);
            return Some(ip);
        }

        match ctx.interface_table().by_name(&value) {
            Some(iface) => {
                if let Some(ip) = iface.candidate_ipv4().next() {
                    debug!("myIpAddress: using {} from interface {}", ip, value);
                    return Some(ip);
                }
                debug!("myIpAddress: interface {} has no usable IPv4 address", value);
            }
            None => warn!(
                "myIpAddress: override {:?} is neither an IPv4 address nor an interface",
                value
            ),
        }
    }

    let interfaces = ctx.interface_table().interfaces();
    interfaces.iter().flat_map(|iface| iface.candidate_ipv4()).last()
}
