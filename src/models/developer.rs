use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Preferred operating system, stored as the `os_type` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "os_type")]
pub enum OperatingSystem {
    Windows,
    Linux,
    MacOS,
}

impl OperatingSystem {
    pub const ALL: [OperatingSystem; 3] = [
        OperatingSystem::Windows,
        OperatingSystem::Linux,
        OperatingSystem::MacOS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingSystem::Windows => "Windows",
            OperatingSystem::Linux => "Linux",
            OperatingSystem::MacOS => "MacOS",
        }
    }

    /// "Windows,Linux,MacOS", used in rejection messages.
    pub fn options() -> String {
        Self::ALL.iter().map(|o| o.as_str()).collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("Preferred OS are {}", Self::options()))
    }
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperInfo {
    pub id: i64,
    pub developer_since: NaiveDate,
    #[serde(rename = "preferredOS")]
    pub preferred_os: OperatingSystem,
    pub developer_id: i64,
}

/// A developer joined with its optional info row.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDetail {
    pub developer_id: i64,
    pub developer_name: String,
    pub developer_email: String,
    pub developer_info_developer_since: Option<NaiveDate>,
    #[serde(rename = "developerInfoPreferredOS")]
    pub developer_info_preferred_os: Option<OperatingSystem>,
}
