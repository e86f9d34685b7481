use serde::Serialize;
use serde_json::Value;

use super::devices::PortValue;

/// Description carried by every derived backhaul interface
pub const BACKHAUL_DESCRIPTION: &str = "BACKHAUL";

/// Prefix marking an auto-generated interface name
pub const PLACEHOLDER_PREFIX: &str = "Port_";

/// Name used when neither an explicit name nor a port is known
pub const PLACEHOLDER_NAME: &str = "Port_BH";

/// InterfaceSpec is one derived backhaul interface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceSpec {
    pub name: String,
    pub description: String,
    pub vlan: Option<u32>,
    pub ip: Option<String>,
    pub mtu: Option<u32>,
    pub port: Option<PortValue>,
    pub neighbor_name: Option<String>,
    pub neighbor_port: Option<String>,
    pub neighbor_ip: Option<String>,
    /// Synthesized link identifier, kept even when `name` came from elsewhere
    pub saos10_link_id: String,
}

/// An entry of the `interfaces` list handed to templates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Interface {
    Backhaul(InterfaceSpec),
    /// Pre-built interface from `other_interfaces`, passed through untouched
    Other(Value),
}

#[cfg(test)]
impl Interface {
    pub fn as_backhaul(&self) -> Option<&InterfaceSpec> {
        match self {
            Interface::Backhaul(spec) => Some(spec),
            Interface::Other(_) => None,
        }
    }
}
