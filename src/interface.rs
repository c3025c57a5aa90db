// src/interface.rs
use pnet::datalink;
use std::net::{IpAddr, Ipv4Addr};

/// One network interface and the addresses bound to it, in kernel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub addrs: Vec<IpAddr>,
}

impl Interface {
    pub fn new(name: &str, addrs: &[IpAddr]) -> Self {
        Self {
            name: name.to_string(),
            addrs: addrs.to_vec(),
        }
    }

    /// IPv4 addresses usable as "my address": not loopback, not link-local.
    pub fn candidate_ipv4(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.addrs.iter().filter_map(|addr| match addr {
            IpAddr::V4(v4) if is_candidate(v4) => Some(*v4),
            _ => None,
        })
    }
}

pub fn is_candidate(addr: &Ipv4Addr) -> bool {
    !addr.is_loopback() && !addr.is_link_local()
}

pub trait InterfaceTable: Send + Sync {
    fn interfaces(&self) -> Vec<Interface>;

    fn by_name(&self, name: &str) -> Option<Interface> {
        self.interfaces().into_iter().find(|i| i.name == name)
    }
}

/// The live table, enumerated on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

impl InterfaceTable for SystemInterfaces {
    fn interfaces(&self) -> Vec<Interface> {
        datalink::interfaces()
            .into_iter()
            .map(|iface| Interface {
                addrs: iface.ips.iter().map(|net| net.ip()).collect(),
                name: iface.name,
            })
            .collect()
    }
}

#[derive(Debug, Default, Clone)]
pub struct StaticInterfaces(pub Vec<Interface>);

impl InterfaceTable for StaticInterfaces {
    fn interfaces(&self) -> Vec<Interface> {
        self.0.clone()
    }
}
