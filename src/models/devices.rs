use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Backhaul topology of a device.
///
/// Anything other than `single` or `dual` (including a missing field) is
/// treated as unspecified, which yields no backhaul interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backhaul {
    Single,
    Dual,
    #[default]
    Unspecified,
}

impl Backhaul {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backhaul::Single => "single",
            Backhaul::Dual => "dual",
            Backhaul::Unspecified => "",
        }
    }

    /// Backhaul roles configured for this topology, in output order
    pub fn roles(&self) -> &'static [LinkRole] {
        match self {
            Backhaul::Single => &[LinkRole::Single],
            Backhaul::Dual => &[LinkRole::Primary, LinkRole::Secondary],
            Backhaul::Unspecified => &[],
        }
    }
}

impl From<&str> for Backhaul {
    fn from(s: &str) -> Self {
        match s.trim() {
            "single" => Backhaul::Single,
            "dual" => Backhaul::Dual,
            _ => Backhaul::Unspecified,
        }
    }
}

impl Serialize for Backhaul {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Backhaul {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Backhaul::from).unwrap_or_default())
    }
}

/// Which backhaul link a set of `{role}_*` fields describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Single,
    Primary,
    Secondary,
}

impl LinkRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkRole::Single => "single",
            LinkRole::Primary => "primary",
            LinkRole::Secondary => "secondary",
        }
    }

    /// Position of this link's group in `DeviceRecord::aggregations`
    pub fn aggregation_index(&self) -> usize {
        match self {
            LinkRole::Single | LinkRole::Primary => 0,
            LinkRole::Secondary => 1,
        }
    }
}

/// A backhaul port: one physical port, or the member ports of an aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PortValue {
    Port(String),
    Members(Vec<String>),
}

impl PortValue {
    /// The port used where a single port is displayed: the port itself, or
    /// the first aggregation member.
    pub fn representative(&self) -> Option<&str> {
        let port = match self {
            PortValue::Port(p) => p.as_str(),
            PortValue::Members(members) => members.first().map(String::as_str)?,
        };
        let port = port.trim();
        (!port.is_empty()).then_some(port)
    }
}

/// Named aggregation group and its member ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub members: Vec<String>,
}

/// DeviceRecord is the full description of a device to commission.
///
/// Per-link fields are flat (`single_port`, `primary_vlan`, ...) to match the
/// names templates use; `link()` gives a typed view over one role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub software_version: String,
    #[serde(default)]
    pub backhaul: Backhaul,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub aggregation_enabled: bool,
    #[serde(default)]
    pub aggregation_name: Option<String>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,

    #[serde(default, deserialize_with = "de_port")]
    pub single_port: Option<PortValue>,
    #[serde(default)]
    pub single_ip: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    pub single_vlan: Option<u32>,
    #[serde(default)]
    pub single_if_name: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    pub single_mtu: Option<u32>,
    #[serde(default)]
    pub single_neighbor_name: Option<String>,
    #[serde(default)]
    pub single_neighbor_port: Option<String>,
    #[serde(default)]
    pub single_neighbor_ip: Option<String>,

    #[serde(default, deserialize_with = "de_port")]
    pub primary_port: Option<PortValue>,
    #[serde(default)]
    pub primary_ip: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    pub primary_vlan: Option<u32>,
    #[serde(default)]
    pub primary_if_name: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    pub primary_mtu: Option<u32>,
    #[serde(default)]
    pub primary_neighbor_name: Option<String>,
    #[serde(default)]
    pub primary_neighbor_port: Option<String>,
    #[serde(default)]
    pub primary_neighbor_ip: Option<String>,

    #[serde(default, deserialize_with = "de_port")]
    pub secondary_port: Option<PortValue>,
    #[serde(default)]
    pub secondary_ip: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    pub secondary_vlan: Option<u32>,
    #[serde(default)]
    pub secondary_if_name: Option<String>,
    #[serde(default, deserialize_with = "de_number")]
    pub secondary_mtu: Option<u32>,
    #[serde(default)]
    pub secondary_neighbor_name: Option<String>,
    #[serde(default)]
    pub secondary_neighbor_port: Option<String>,
    #[serde(default)]
    pub secondary_neighbor_ip: Option<String>,

    #[serde(default)]
    pub other_interfaces: Vec<Value>,

    // Template-only fields
    #[serde(default)]
    pub tacacs_servers: Vec<String>,
    #[serde(default)]
    pub tacacs_secret: Option<String>,
    #[serde(default)]
    pub license_keys: Vec<String>,
    #[serde(default)]
    pub ntp_servers: Vec<String>,
    #[serde(default)]
    pub syslog_collectors: Vec<Value>,
    #[serde(default)]
    pub loopback_ip: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,

    /// Unrecognized keys, passed through to the template context
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Borrowed view of the `{role}_*` fields for one backhaul link
#[derive(Debug, Clone, Copy)]
pub struct LinkFields<'a> {
    pub port: Option<&'a PortValue>,
    pub ip: Option<&'a str>,
    pub vlan: Option<u32>,
    pub if_name: Option<&'a str>,
    pub mtu: Option<u32>,
    pub neighbor_name: Option<&'a str>,
    pub neighbor_port: Option<&'a str>,
    pub neighbor_ip: Option<&'a str>,
}

impl DeviceRecord {
    pub fn link(&self, role: LinkRole) -> LinkFields<'_> {
        match role {
            LinkRole::Single => LinkFields {
                port: self.single_port.as_ref(),
                ip: self.single_ip.as_deref(),
                vlan: self.single_vlan,
                if_name: self.single_if_name.as_deref(),
                mtu: self.single_mtu,
                neighbor_name: self.single_neighbor_name.as_deref(),
                neighbor_port: self.single_neighbor_port.as_deref(),
                neighbor_ip: self.single_neighbor_ip.as_deref(),
            },
            LinkRole::Primary => LinkFields {
                port: self.primary_port.as_ref(),
                ip: self.primary_ip.as_deref(),
                vlan: self.primary_vlan,
                if_name: self.primary_if_name.as_deref(),
                mtu: self.primary_mtu,
                neighbor_name: self.primary_neighbor_name.as_deref(),
                neighbor_port: self.primary_neighbor_port.as_deref(),
                neighbor_ip: self.primary_neighbor_ip.as_deref(),
            },
            LinkRole::Secondary => LinkFields {
                port: self.secondary_port.as_ref(),
                ip: self.secondary_ip.as_deref(),
                vlan: self.secondary_vlan,
                if_name: self.secondary_if_name.as_deref(),
                mtu: self.secondary_mtu,
                neighbor_name: self.secondary_neighbor_name.as_deref(),
                neighbor_port: self.secondary_neighbor_port.as_deref(),
                neighbor_ip: self.secondary_neighbor_ip.as_deref(),
            },
        }
    }

    /// Name of the aggregation group carrying the given link, if any
    pub fn aggregation_group_name(&self, role: LinkRole) -> Option<&str> {
        let from_list = || {
            self.aggregations
                .get(role.aggregation_index())
                .and_then(|agg| non_empty(agg.name.as_deref()))
        };
        match role {
            LinkRole::Single => non_empty(self.aggregation_name.as_deref()).or_else(from_list),
            LinkRole::Primary | LinkRole::Secondary => from_list(),
        }
    }
}

/// Trim an optional string, mapping blank values to None
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept a port as a string, a number, or a list of either
fn de_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PortValue>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(PortValue::Members(
            items.iter().filter_map(scalar_to_string).collect(),
        )),
        other => scalar_to_string(&other)
            .filter(|s| !s.trim().is_empty())
            .map(PortValue::Port),
    })
}

fn de_string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(&other).into_iter().collect(),
    })
}

/// Accept VLAN/MTU as a number or a numeric string; blanks become None
fn de_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
