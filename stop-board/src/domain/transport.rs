//! Transport mode classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of stop a favorite refers to.
///
/// The journey planner uses distinct id spaces for bus stops, train
/// stations, train platforms and ferry terminals; the storage backend
/// records which one a favorite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Bus,
    TrainStation,
    TrainPlatform,
    FerryTerminal,
}

impl TransportType {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TransportType::Bus => "Bus",
            TransportType::TrainStation => "Train station",
            TransportType::TrainPlatform => "Train platform",
            TransportType::FerryTerminal => "Ferry terminal",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Default for TransportType {
    fn default() -> Self {
        TransportType::Bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TransportType::TrainStation).unwrap();
        assert_eq!(json, "\"train_station\"");

        let back: TransportType = serde_json::from_str("\"ferry_terminal\"").unwrap();
        assert_eq!(back, TransportType::FerryTerminal);
    }

    #[test]
    fn unknown_value_rejected() {
        assert!(serde_json::from_str::<TransportType>("\"tram\"").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(TransportType::Bus.to_string(), "Bus");
        assert_eq!(TransportType::TrainPlatform.to_string(), "Train platform");
    }
}
