//! The `Admin` service: introspection of the host the service runs on.

use std::net::IpAddr;

use if_addrs::IfAddr;
use statusd_types::api::{NoArgs, StringsReply};

use crate::api::errors::Error;

/// Administrative RPC methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminService;

impl AdminService {
    /// Lists the addresses of all local interfaces as `ip/prefix`, in the order the host reports them.
    ///
    /// A host without interfaces yields an empty list, serialized as `[]` rather than `null`.
    pub fn get_addresses(&self, _args: NoArgs) -> Result<StringsReply, Error> {
        let interfaces = if_addrs::get_if_addrs().map_err(Error::InterfaceEnumeration)?;
        let strings = interfaces
            .into_iter()
            .map(|interface| match interface.addr {
                IfAddr::V4(v4) => cidr(IpAddr::V4(v4.ip), IpAddr::V4(v4.netmask)),
                IfAddr::V6(v6) => cidr(IpAddr::V6(v6.ip), IpAddr::V6(v6.netmask)),
            })
            .collect();
        Ok(StringsReply { strings })
    }
}

/// Formats `ip` with the prefix length of `netmask`.
fn cidr(ip: IpAddr, netmask: IpAddr) -> String {
    let prefix = match netmask {
        IpAddr::V4(netmask) => u32::from(netmask).count_ones(),
        IpAddr::V6(netmask) => u128::from(netmask).count_ones(),
    };
    format!("{ip}/{prefix}")
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    #[test]
    fn test_cidr() {
        assert_eq!(
            cidr(
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V4(Ipv4Addr::new(255, 0, 0, 0))
            ),
            "127.0.0.1/8"
        );
        assert_eq!(
            cidr(
                IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
                IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0))
            ),
            "192.168.1.20/24"
        );
        assert_eq!(
            cidr(IpAddr::V6(Ipv6Addr::LOCALHOST), IpAddr::V6(Ipv6Addr::from(u128::MAX))),
            "::1/128"
        );
    }

    #[test]
    fn test_no_addresses_serialize_as_empty_list() {
        let reply = StringsReply { strings: vec![] };
        assert_eq!(
            serde_json::to_value(reply).expect("can serialize"),
            serde_json::json!({"Strings": []})
        );
    }

    #[test]
    fn test_get_addresses_lists_loopback() {
        let reply = AdminService.get_addresses(NoArgs {}).expect("can list interfaces");
        assert!(!reply.strings.is_empty());
        assert!(reply.strings.iter().all(|addr| addr.contains('/')));
    }
}
