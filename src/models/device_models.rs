use serde::Serialize;

/// Canonical software family tags
pub mod software_family {
    pub const SAOS6: &str = "saos6";
    pub const SAOS8: &str = "saos8";
    pub const SAOS10: &str = "saos10";

    pub const ALL: &[&str] = &[SAOS6, SAOS8, SAOS10];

    /// Empty means "unspecified" and is accepted
    pub fn is_valid(software: &str) -> bool {
        software.is_empty() || ALL.contains(&software)
    }
}

/// HardwareModel describes one entry of the closed device catalog
#[derive(Debug, Clone, Copy)]
pub struct HardwareModel {
    pub id: &'static str,
    pub port_count: u32,
    /// Slot prefix for models whose ports are numbered `slot.port`
    pub port_slot: Option<&'static str>,
}

impl HardwareModel {
    /// Front-panel port names in display order
    pub fn ports(&self) -> Vec<String> {
        (1..=self.port_count)
            .map(|i| match self.port_slot {
                Some(slot) => format!("{}.{}", slot, i),
                None => i.to_string(),
            })
            .collect()
    }

    /// The 3903 is a small single-uplink unit
    fn is_compact(&self) -> bool {
        self.id == "3903"
    }

    pub fn supports_dual_backhaul(&self) -> bool {
        !self.is_compact()
    }

    pub fn supports_aggregation(&self) -> bool {
        !self.is_compact()
    }

    pub fn supports_loopback(&self) -> bool {
        !self.is_compact()
    }

    /// Compact units take their default gateway from the backhaul neighbor
    pub fn gateway_from_neighbor(&self) -> bool {
        self.is_compact()
    }
}

pub const HARDWARE_MODELS: &[HardwareModel] = &[
    HardwareModel { id: "3903", port_count: 3, port_slot: None },
    HardwareModel { id: "3916", port_count: 6, port_slot: None },
    HardwareModel { id: "3926", port_count: 8, port_slot: Some("1") },
    HardwareModel { id: "3928", port_count: 12, port_slot: None },
    HardwareModel { id: "5142", port_count: 24, port_slot: None },
    HardwareModel { id: "5130", port_count: 14, port_slot: None },
    HardwareModel { id: "5171", port_count: 40, port_slot: None },
    HardwareModel { id: "8110", port_count: 26, port_slot: None },
    HardwareModel { id: "8114", port_count: 20, port_slot: None },
];

/// Look up a catalog entry by model id
pub fn find_model(id: &str) -> Option<&'static HardwareModel> {
    let id = id.trim();
    HARDWARE_MODELS.iter().find(|m| m.id == id)
}

/// ModelInfo is the API view of a catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub ports: Vec<String>,
    pub backhauls: Vec<String>,
    pub aggregation: bool,
    pub loopback: bool,
}

impl From<&HardwareModel> for ModelInfo {
    fn from(m: &HardwareModel) -> Self {
        let mut backhauls = vec!["single".to_string()];
        if m.supports_dual_backhaul() {
            backhauls.push("dual".to_string());
        }
        Self {
            model: m.id.to_string(),
            ports: m.ports(),
            backhauls,
            aggregation: m.supports_aggregation(),
            loopback: m.supports_loopback(),
        }
    }
}

/// ModelCatalogResponse lists every model and software family
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalogResponse {
    pub models: Vec<ModelInfo>,
    pub software_families: Vec<String>,
}
