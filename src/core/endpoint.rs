use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A provider-specific annotation carried alongside an endpoint, used for
/// metadata the generic record model does not natively support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// Generic DNS record representation exchanged with external-dns over the
/// webhook protocol. Field names follow the external-dns wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(rename = "recordTTL", skip_serializing_if = "Option::is_none")]
    pub record_ttl: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    pub fn with_ttl(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        target: impl Into<String>,
    ) -> Self {
        Endpoint {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            record_ttl: Some(ttl),
            targets: vec![target.into()],
            ..Default::default()
        }
    }

    /// The triple endpoints are matched on during adjustment.
    pub fn key(&self) -> (&str, &str, Option<&str>) {
        (
            &self.dns_name,
            &self.record_type,
            self.set_identifier.as_deref(),
        )
    }

    pub fn get_provider_specific(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn set_provider_specific(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.provider_specific.iter_mut().find(|p| p.name == name) {
            Some(prop) => prop.value = value,
            None => self.provider_specific.push(ProviderSpecificProperty {
                name: name.to_string(),
                value,
            }),
        }
    }
}

/// The creates/updates/deletes to apply in one reconciliation cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Changes {
    #[serde(rename = "Create", skip_serializing_if = "Vec::is_empty")]
    pub create: Vec<Endpoint>,
    #[serde(rename = "UpdateOld", skip_serializing_if = "Vec::is_empty")]
    pub update_old: Vec<Endpoint>,
    #[serde(rename = "UpdateNew", skip_serializing_if = "Vec::is_empty")]
    pub update_new: Vec<Endpoint>,
    #[serde(rename = "Delete", skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    pub fn has_changes(&self) -> bool {
        !self.create.is_empty()
            || !self.update_old.is_empty()
            || !self.update_new.is_empty()
            || !self.delete.is_empty()
    }
}
