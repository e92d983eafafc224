use crate::core::endpoint::Endpoint;
use crate::providers::bunny::types::{MonitorType, Record};

pub const MONITOR_TYPE_ANNOTATION: &str = "webhook/bunny-monitor-type";
pub const WEIGHT_ANNOTATION: &str = "webhook/bunny-weight";
pub const DISABLED_ANNOTATION: &str = "webhook/bunny-disabled";

/// Bunny-specific record fields carried through endpoint annotations so that
/// diffing against desired state does not churn on provider defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpecificOptions {
    pub monitor_type: MonitorType,
    pub weight: i32,
    pub disabled: bool,
}

/// Reads the Bunny annotations off an endpoint. Parsing is deliberately
/// forgiving: a missing, unparseable, or zero weight means the Bunny default
/// of 100, anything else is clamped to [1, 100]; an unknown monitor type
/// means no monitor; an unparseable disabled flag means enabled.
pub fn options_from_endpoint(ep: &Endpoint) -> ProviderSpecificOptions {
    let monitor_type = ep
        .get_provider_specific(MONITOR_TYPE_ANNOTATION)
        .map(MonitorType::from_name)
        .unwrap_or(MonitorType::None);

    let weight = match ep
        .get_provider_specific(WEIGHT_ANNOTATION)
        .map(str::parse::<i32>)
    {
        Some(Ok(w)) if w != 0 => w.clamp(1, 100),
        _ => 100,
    };

    let disabled = ep
        .get_provider_specific(DISABLED_ANNOTATION)
        .map(|v| v.parse().unwrap_or(false))
        .unwrap_or(false);

    ProviderSpecificOptions {
        monitor_type,
        weight,
        disabled,
    }
}

pub fn options_from_record(record: &Record) -> ProviderSpecificOptions {
    ProviderSpecificOptions {
        monitor_type: record.monitor_type,
        weight: record.weight,
        disabled: record.disabled,
    }
}

impl ProviderSpecificOptions {
    pub fn apply_to(&self, ep: &mut Endpoint) {
        ep.set_provider_specific(MONITOR_TYPE_ANNOTATION, self.monitor_type.as_str());
        ep.set_provider_specific(WEIGHT_ANNOTATION, self.weight.to_string());
        ep.set_provider_specific(DISABLED_ANNOTATION, self.disabled.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_with_weight(weight: &str) -> Endpoint {
        let mut ep = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        ep.set_provider_specific(WEIGHT_ANNOTATION, weight);
        ep
    }

    #[test]
    fn test_weight_defaults_and_clamping() {
        // Missing annotation defaults to 100.
        let ep = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        assert_eq!(options_from_endpoint(&ep).weight, 100);

        // Unparseable and zero weights also default, never error.
        assert_eq!(options_from_endpoint(&endpoint_with_weight("abc")).weight, 100);
        assert_eq!(options_from_endpoint(&endpoint_with_weight("0")).weight, 100);

        // Out-of-range weights are clamped to [1, 100].
        assert_eq!(options_from_endpoint(&endpoint_with_weight("150")).weight, 100);
        assert_eq!(options_from_endpoint(&endpoint_with_weight("-5")).weight, 1);
        assert_eq!(options_from_endpoint(&endpoint_with_weight("42")).weight, 42);
    }

    #[test]
    fn test_monitor_type_defaults_to_none() {
        let mut ep = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        assert_eq!(
            options_from_endpoint(&ep).monitor_type,
            MonitorType::None
        );

        ep.set_provider_specific(MONITOR_TYPE_ANNOTATION, "Ping");
        assert_eq!(
            options_from_endpoint(&ep).monitor_type,
            MonitorType::Ping
        );

        ep.set_provider_specific(MONITOR_TYPE_ANNOTATION, "unknown-kind");
        assert_eq!(
            options_from_endpoint(&ep).monitor_type,
            MonitorType::None
        );
    }

    #[test]
    fn test_disabled_parse_is_best_effort() {
        let mut ep = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        assert!(!options_from_endpoint(&ep).disabled);

        ep.set_provider_specific(DISABLED_ANNOTATION, "true");
        assert!(options_from_endpoint(&ep).disabled);

        ep.set_provider_specific(DISABLED_ANNOTATION, "not-a-bool");
        assert!(!options_from_endpoint(&ep).disabled);
    }

    #[test]
    fn test_record_options_round_trip_through_annotations() {
        let record = Record {
            monitor_type: MonitorType::Http,
            weight: 60,
            disabled: true,
            ..Default::default()
        };
        let mut ep = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        options_from_record(&record).apply_to(&mut ep);

        let opts = options_from_endpoint(&ep);
        assert_eq!(opts.monitor_type, MonitorType::Http);
        assert_eq!(opts.weight, 60);
        assert!(opts.disabled);
    }
}
