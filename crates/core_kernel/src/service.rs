//! Service-line classification shared by patients, hospitals, and invoices

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The service line a patient visit was billed under
///
/// Each hospital agreement carries a separate share percentage per
/// service line, so the classification drives share selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "OP")]
    Op,
    #[serde(rename = "IP")]
    Ip,
    Diagnostic,
}

impl ServiceType {
    /// Canonical label used in API payloads and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Op => "OP",
            ServiceType::Ip => "IP",
            ServiceType::Diagnostic => "Diagnostic",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OP" => Ok(ServiceType::Op),
            "IP" => Ok(ServiceType::Ip),
            "Diagnostic" => Ok(ServiceType::Diagnostic),
            other => Err(format!("Unknown service type: {other}")),
        }
    }
}
