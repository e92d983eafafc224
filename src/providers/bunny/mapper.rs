use crate::core::endpoint::Endpoint;
use crate::providers::bunny::annotations::{options_from_endpoint, options_from_record};
use crate::providers::bunny::types::{CreateRecordRequest, Record, RecordType, UpdateRecordRequest};

/// Maps a zone-relative record onto the generic endpoint model. The Bunny
/// annotations are always applied so the diff step never manufactures
/// changes from provider-defaulted fields.
pub fn record_to_endpoint(domain: &str, record: &Record) -> Endpoint {
    // An empty short name is the zone apex.
    let dns_name = if record.name.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", record.name, domain)
    };

    let mut ep = Endpoint::with_ttl(
        dns_name,
        record.record_type.as_str(),
        record.ttl_seconds,
        record.value.clone(),
    );
    options_from_record(record).apply_to(&mut ep);
    ep
}

pub fn endpoint_to_create_request(record_name: &str, ep: &Endpoint) -> CreateRecordRequest {
    let opts = options_from_endpoint(ep);
    CreateRecordRequest {
        record_type: RecordType::from_name(&ep.record_type),
        ttl_seconds: ep.record_ttl.unwrap_or(0),
        value: ep.targets.first().cloned().unwrap_or_default(),
        name: record_name.to_string(),
        monitor_type: opts.monitor_type,
        weight: opts.weight,
        disabled: opts.disabled,
    }
}

pub fn endpoint_to_update_request(ep: &Endpoint) -> UpdateRecordRequest {
    let opts = options_from_endpoint(ep);
    UpdateRecordRequest {
        ttl_seconds: ep.record_ttl.unwrap_or(0),
        value: ep.targets.first().cloned().unwrap_or_default(),
        monitor_type: opts.monitor_type,
        weight: opts.weight,
        disabled: opts.disabled,
    }
}
