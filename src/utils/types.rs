use serde::{Deserialize, Serialize};

/// One of the four tested hardware areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Cpu,
    Memory,
    Disk,
    Network,
}

impl Subsystem {
    /// Fixed evaluation order. Recommendations follow it too.
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Cpu,
        Subsystem::Memory,
        Subsystem::Disk,
        Subsystem::Network,
    ];

    /// Directory name under `performance/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Subsystem::Cpu => "cpu",
            Subsystem::Memory => "memory",
            Subsystem::Disk => "disk",
            Subsystem::Network => "network",
        }
    }

    /// Per-device subdirectories that never count as a device.
    pub fn ignored_devices(self) -> &'static [&'static str] {
        match self {
            Subsystem::Network => &["lo"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Poor,
    Fair,
    Good,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unknown => write!(f, "unknown"),
            Status::Poor => write!(f, "poor"),
            Status::Fair => write!(f, "fair"),
            Status::Good => write!(f, "good"),
        }
    }
}
