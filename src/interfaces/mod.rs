pub mod link_id;

pub use link_id::{derive_link_id, extract_model_token, SiteToken};

use crate::models::{
    non_empty, DeviceRecord, Interface, InterfaceSpec, LinkRole, PortValue, BACKHAUL_DESCRIPTION,
    PLACEHOLDER_NAME, PLACEHOLDER_PREFIX,
};

/// Build the interface list for a device: its backhaul links (one for
/// single, primary then secondary for dual) followed by `other_interfaces`
/// exactly as supplied.
///
/// Pure function of the record; missing fields degrade to placeholders.
pub fn derive_interfaces(device: &DeviceRecord) -> Vec<Interface> {
    let mut interfaces: Vec<Interface> = device
        .backhaul
        .roles()
        .iter()
        .map(|role| Interface::Backhaul(derive_backhaul(device, *role)))
        .collect();
    interfaces.extend(device.other_interfaces.iter().cloned().map(Interface::Other));
    interfaces
}

fn derive_backhaul(device: &DeviceRecord, role: LinkRole) -> InterfaceSpec {
    let link = device.link(role);
    let port = link.port.and_then(PortValue::representative);
    let link_id = derive_link_id(&device.hostname, link.neighbor_name.unwrap_or_default());
    let name = resolve_name(link.if_name, &link_id, port);

    // An aggregated link is addressed by its group name
    let port_value = if device.aggregation_enabled {
        device
            .aggregation_group_name(role)
            .map(|group| PortValue::Port(group.to_string()))
            .or_else(|| link.port.cloned())
    } else {
        link.port.cloned()
    };

    InterfaceSpec {
        name,
        description: BACKHAUL_DESCRIPTION.to_string(),
        vlan: link.vlan,
        ip: non_empty(link.ip).map(str::to_string),
        mtu: link.mtu,
        port: port_value,
        neighbor_name: non_empty(link.neighbor_name).map(str::to_string),
        neighbor_port: non_empty(link.neighbor_port).map(str::to_string),
        neighbor_ip: non_empty(link.neighbor_ip).map(str::to_string),
        saos10_link_id: link_id,
    }
}

fn is_placeholder(name: &str) -> bool {
    name.starts_with(PLACEHOLDER_PREFIX)
}

/// Pick the interface name.
///
/// 1. an operator-supplied name that is not a `Port_` placeholder
/// 2. the synthesized link id, when there is one
/// 3. the supplied placeholder, `Port_<port>`, or `Port_BH`
pub fn resolve_name(explicit: Option<&str>, link_id: &str, port: Option<&str>) -> String {
    let explicit = explicit.filter(|name| !name.trim().is_empty());

    if let Some(name) = explicit.filter(|name| !is_placeholder(name.trim())) {
        return name.to_string();
    }
    if !link_id.is_empty() {
        return link_id.to_string();
    }
    match (explicit, port) {
        (Some(name), _) => name.to_string(),
        (None, Some(port)) => format!("{}{}", PLACEHOLDER_PREFIX, port),
        (None, None) => PLACEHOLDER_NAME.to_string(),
    }
}
