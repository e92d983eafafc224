use serde::{Deserialize, Serialize};
use std::fmt;

/// Bunny.net DNS record types. The API encodes these as integers.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    TXT,
    MX,
    /// HTTP redirect.
    RDR,
    /// CNAME flattening at the zone apex.
    Flatten,
    /// Pull zone link.
    PZ,
    SRV,
    CAA,
    PTR,
    /// Edge script.
    SCR,
    NS,
    #[default]
    Unknown,
}

impl From<i32> for RecordType {
    fn from(value: i32) -> Self {
        match value {
            0 => RecordType::A,
            1 => RecordType::AAAA,
            2 => RecordType::CNAME,
            3 => RecordType::TXT,
            4 => RecordType::MX,
            5 => RecordType::RDR,
            6 => RecordType::Flatten,
            7 => RecordType::PZ,
            8 => RecordType::SRV,
            9 => RecordType::CAA,
            10 => RecordType::PTR,
            11 => RecordType::SCR,
            12 => RecordType::NS,
            _ => RecordType::Unknown,
        }
    }
}

impl From<RecordType> for i32 {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::A => 0,
            RecordType::AAAA => 1,
            RecordType::CNAME => 2,
            RecordType::TXT => 3,
            RecordType::MX => 4,
            RecordType::RDR => 5,
            RecordType::Flatten => 6,
            RecordType::PZ => 7,
            RecordType::SRV => 8,
            RecordType::CAA => 9,
            RecordType::PTR => 10,
            RecordType::SCR => 11,
            RecordType::NS => 12,
            RecordType::Unknown => -1,
        }
    }
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::TXT => "TXT",
            RecordType::MX => "MX",
            RecordType::RDR => "RDR",
            RecordType::Flatten => "FLATTEN",
            RecordType::PZ => "PZ",
            RecordType::SRV => "SRV",
            RecordType::CAA => "CAA",
            RecordType::PTR => "PTR",
            RecordType::SCR => "SCR",
            RecordType::NS => "NS",
            RecordType::Unknown => "?",
        }
    }

    pub fn from_name(name: &str) -> RecordType {
        match name {
            "A" => RecordType::A,
            "AAAA" => RecordType::AAAA,
            "CNAME" => RecordType::CNAME,
            "TXT" => RecordType::TXT,
            "MX" => RecordType::MX,
            "RDR" => RecordType::RDR,
            "FLATTEN" => RecordType::Flatten,
            "PZ" => RecordType::PZ,
            "SRV" => RecordType::SRV,
            "CAA" => RecordType::CAA,
            "PTR" => RecordType::PTR,
            "SCR" => RecordType::SCR,
            "NS" => RecordType::NS,
            _ => RecordType::Unknown,
        }
    }

    /// Whether external-dns understands this record type. Records of other
    /// types are skipped on the read path rather than reported as errors.
    pub fn supported(self) -> bool {
        matches!(
            self,
            RecordType::A
                | RecordType::AAAA
                | RecordType::CNAME
                | RecordType::MX
                | RecordType::NS
                | RecordType::SRV
                | RecordType::TXT
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type of health monitor attached to a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MonitorType {
    #[default]
    None,
    Ping,
    Http,
}

impl From<i32> for MonitorType {
    fn from(value: i32) -> Self {
        match value {
            1 => MonitorType::Ping,
            2 => MonitorType::Http,
            _ => MonitorType::None,
        }
    }
}

impl From<MonitorType> for i32 {
    fn from(value: MonitorType) -> Self {
        match value {
            MonitorType::None => 0,
            MonitorType::Ping => 1,
            MonitorType::Http => 2,
        }
    }
}

impl MonitorType {
    pub fn as_str(self) -> &'static str {
        match self {
            MonitorType::None => "none",
            MonitorType::Ping => "ping",
            MonitorType::Http => "http",
        }
    }

    /// Case-insensitive; anything unrecognized means no monitor.
    pub fn from_name(name: &str) -> MonitorType {
        match name.to_lowercase().as_str() {
            "ping" => MonitorType::Ping,
            "http" => MonitorType::Http,
            _ => MonitorType::None,
        }
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS resource record as Bunny.net returns it. The id is assigned by the
/// provider on creation and is immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    #[serde(rename = "Ttl")]
    pub ttl_seconds: u32,
    #[serde(rename = "Value")]
    pub value: String,
    /// Short name, relative to the owning zone.
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Weight")]
    pub weight: i32,
    #[serde(rename = "Priority")]
    pub priority: i32,
    #[serde(rename = "Port")]
    pub port: i32,
    #[serde(rename = "Flags")]
    pub flags: i32,
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "MonitorType")]
    pub monitor_type: MonitorType,
    #[serde(rename = "Accelerated")]
    pub accelerated: bool,
    #[serde(rename = "AcceleratedPullZoneId")]
    pub accelerated_pull_zone_id: i64,
    #[serde(rename = "LinkName")]
    pub link_name: String,
    #[serde(rename = "Disabled")]
    pub disabled: bool,
    #[serde(rename = "Comment")]
    pub comment: String,
}

/// A DNS zone managed by Bunny.net, keyed by its unique domain name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Zone {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Records")]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default)]
pub struct ListZonesRequest {
    pub page: i32,
    /// Defaults to 1000 when unset.
    pub per_page: i32,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListZonesResponse {
    #[serde(rename = "Items")]
    pub items: Vec<Zone>,
    #[serde(rename = "CurrentPage")]
    pub current_page: i32,
    #[serde(rename = "TotalItems")]
    pub total_items: i32,
    #[serde(rename = "HasMoreItems")]
    pub has_more_items: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    #[serde(rename = "Ttl")]
    pub ttl_seconds: u32,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MonitorType")]
    pub monitor_type: MonitorType,
    #[serde(rename = "Weight")]
    pub weight: i32,
    #[serde(rename = "Disabled")]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    #[serde(rename = "Ttl")]
    pub ttl_seconds: u32,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "MonitorType")]
    pub monitor_type: MonitorType,
    #[serde(rename = "Weight")]
    pub weight: i32,
    #[serde(rename = "Disabled")]
    pub disabled: bool,
}
