//! Lifecycle status shared by every resource

use serde::{Deserialize, Serialize};

/// Lifecycle flag, stored on disk as a small integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i8", into = "i8")]
pub enum Status {
    /// Unset; as a filter it matches every status
    #[default]
    Unknown,
    Enabled,
    Disabled,
}

impl Status {
    pub fn is_enabled(self) -> bool {
        self == Status::Enabled
    }
}

impl From<i8> for Status {
    /// Values outside the known range decode as `Unknown`
    fn from(value: i8) -> Self {
        match value {
            1 => Status::Enabled,
            2 => Status::Disabled,
            _ => Status::Unknown,
        }
    }
}

impl From<Status> for i8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown => 0,
            Status::Enabled => 1,
            Status::Disabled => 2,
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" | "0" => Ok(Status::Unknown),
            "enabled" | "1" => Ok(Status::Enabled),
            "disabled" | "2" => Ok(Status::Disabled),
            other => Err(format!("unknown status {:?}", other)),
        }
    }
}
