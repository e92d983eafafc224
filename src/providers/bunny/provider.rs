use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::core::endpoint::{Changes, Endpoint};
use crate::core::filter::DomainFilter;
use crate::core::provider::Provider;
use crate::error::Error;
use crate::providers::bunny::client::BunnyApi;
use crate::providers::bunny::error::{map_error, BunnyError, BunnyErrorKind, ErrorContext};
use crate::providers::bunny::mapper::{
    endpoint_to_create_request, endpoint_to_update_request, record_to_endpoint,
};
use crate::providers::bunny::types::{ListZonesRequest, Zone};

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub dry_run: bool,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub include_domains_regexp: String,
    pub exclude_domains_regexp: String,
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        Options {
            dry_run: config.dry_run,
            include_domains: config.include_domains.clone(),
            exclude_domains: config.exclude_domains.clone(),
            include_domains_regexp: config.include_domains_regexp.clone(),
            exclude_domains_regexp: config.exclude_domains_regexp.clone(),
        }
    }
}

/// Concurrent domain -> zone id mapping. Entries are only ever added or
/// overwritten wholesale by a refresh pass, never invalidated individually,
/// so readers racing a population see either the old or the new id for a
/// domain, never a torn entry.
pub struct ZoneCache {
    map: RwLock<HashMap<String, i64>>,
}

impl ZoneCache {
    pub fn new() -> Self {
        ZoneCache {
            map: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, domain: &str, zone_id: i64) {
        self.map
            .write()
            .expect("zone cache lock poisoned")
            .insert(domain.to_string(), zone_id);
    }

    pub fn lookup(&self, domain: &str) -> Option<i64> {
        self.map
            .read()
            .expect("zone cache lock poisoned")
            .get(domain)
            .copied()
    }

    /// Point-in-time snapshot of all known domains, safe to iterate while
    /// a concurrent refresh is running.
    pub fn domains(&self) -> Vec<String> {
        self.map
            .read()
            .expect("zone cache lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for ZoneCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a fully qualified DNS name into (record name, zone domain) against
/// the known zone domains. The longest matching suffix wins, so a name under
/// a delegated child zone resolves to the child rather than the parent; the
/// match has to sit on a label boundary. An exact zone match yields an empty
/// record name (the apex).
pub fn extract_record_components<'a>(
    domains: &'a [String],
    dns_name: &str,
) -> Option<(String, &'a str)> {
    let mut best: Option<&'a str> = None;
    for domain in domains {
        let is_suffix = dns_name == domain
            || (dns_name.len() > domain.len()
                && dns_name.ends_with(domain.as_str())
                && dns_name.as_bytes()[dns_name.len() - domain.len() - 1] == b'.');
        if is_suffix && best.is_none_or(|b| domain.len() > b.len()) {
            best = Some(domain);
        }
    }

    let domain = best?;
    let record_name = if dns_name.len() == domain.len() {
        String::new()
    } else {
        dns_name[..dns_name.len() - domain.len() - 1].to_string()
    };
    Some((record_name, domain))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IdentifierTuple {
    zone_id: i64,
    record_id: i64,
}

pub struct BunnyProvider {
    api: Arc<dyn BunnyApi>,
    options: Options,
    filter: DomainFilter,
    zone_cache: ZoneCache,
}

impl BunnyProvider {
    /// Builds the provider and warms the zone cache so creates can resolve
    /// zone ids without an extra API round trip, and so record names can be
    /// split off full DNS names without maintaining a TLD list. A failed
    /// startup fetch is logged, not fatal; the cache refills on first use.
    pub async fn new(api: Arc<dyn BunnyApi>, options: Options) -> Result<Self, Error> {
        let filter = domain_filter_from_options(&options)?;
        let provider = BunnyProvider {
            api,
            options,
            filter,
            zone_cache: ZoneCache::new(),
        };

        if let Err(err) = provider.fetch_zones().await {
            error!(error = %err, "failed to fetch zones on startup");
        }

        Ok(provider)
    }

    #[cfg(test)]
    pub(crate) fn zone_cache(&self) -> &ZoneCache {
        &self.zone_cache
    }

    /// Full paginated zone listing. Every returned zone is cached as a side
    /// effect; the collected list (records included) is returned for reuse
    /// within the same cycle. A failed page aborts the refresh but pages
    /// already fetched stay committed — the cache only ever grows richer.
    async fn fetch_zones(&self) -> Result<Vec<Zone>, BunnyError> {
        let mut page = 1;
        let mut zones = Vec::new();

        loop {
            let results = self
                .api
                .list_zones(ListZonesRequest {
                    page,
                    per_page: 1000,
                    search: None,
                })
                .await?;

            for zone in results.items {
                self.zone_cache.insert(&zone.domain, zone.id);
                zones.push(zone);
            }

            if !results.has_more_items {
                break;
            }
            page += 1;
        }

        Ok(zones)
    }

    async fn create_endpoints(&self, creates: &[Endpoint]) -> Result<(), BunnyError> {
        for create in creates {
            let domains = self.zone_cache.domains();
            let (record_name, domain) = extract_record_components(&domains, &create.dns_name)
                .ok_or_else(|| {
                    ErrorContext::new("CreateEndpoints")
                        .with("dns_name", &create.dns_name)
                        .wrap(BunnyErrorKind::ZoneNotFound(create.dns_name.clone()))
                })?;
            let zone_id = self.zone_cache.lookup(domain).ok_or_else(|| {
                ErrorContext::new("CreateEndpoints")
                    .with("dns_name", &create.dns_name)
                    .with("domain", domain)
                    .wrap(BunnyErrorKind::ZoneNotFound(create.dns_name.clone()))
            })?;

            let record = endpoint_to_create_request(&record_name, create);
            debug!(
                zone = domain,
                zone_id,
                name = %record.name,
                r#type = %record.record_type,
                value = %record.value,
                ttl = record.ttl_seconds,
                "creating record"
            );

            let created = self.api.create_record(zone_id, record).await?;

            info!(
                zone = domain,
                zone_id,
                record_id = created.id,
                name = %created.name,
                "record created"
            );
        }

        Ok(())
    }

    /// Resolves (zone id, record id) for every given DNS name with a single
    /// fresh zone listing. Names without a matching zone fail the whole
    /// cycle here; names whose record is missing are caught by the callers,
    /// which treat an absent tuple as fatal.
    async fn fetch_identifiers(
        &self,
        dns_names: &[String],
    ) -> Result<HashMap<String, IdentifierTuple>, BunnyError> {
        let zones = self.fetch_zones().await?;
        let domains: Vec<String> = zones.iter().map(|z| z.domain.clone()).collect();

        let mut identifiers = HashMap::new();
        for dns_name in dns_names {
            let (record_name, domain) =
                extract_record_components(&domains, dns_name).ok_or_else(|| {
                    ErrorContext::new("FetchIdentifiers")
                        .with("dns_name", dns_name)
                        .wrap(BunnyErrorKind::ZoneNotFound(dns_name.clone()))
                })?;

            for zone in zones.iter().filter(|z| z.domain == domain) {
                for record in &zone.records {
                    if record.name == record_name {
                        identifiers.insert(
                            dns_name.clone(),
                            IdentifierTuple {
                                zone_id: zone.id,
                                record_id: record.id,
                            },
                        );
                    }
                }
            }
        }

        Ok(identifiers)
    }

    async fn delete_endpoints(
        &self,
        identifiers: &HashMap<String, IdentifierTuple>,
        deletions: &[Endpoint],
    ) -> Result<(), BunnyError> {
        for deletion in deletions {
            let tuple = identifiers.get(&deletion.dns_name).ok_or_else(|| {
                ErrorContext::new("DeleteEndpoints")
                    .with("dns_name", &deletion.dns_name)
                    .wrap(BunnyErrorKind::RecordNotFound(deletion.dns_name.clone()))
            })?;

            self.api
                .delete_record(tuple.zone_id, tuple.record_id)
                .await?;

            info!(
                zone_id = tuple.zone_id,
                record_id = tuple.record_id,
                name = %deletion.dns_name,
                "record deleted"
            );
        }

        Ok(())
    }

    async fn update_endpoints(
        &self,
        identifiers: &HashMap<String, IdentifierTuple>,
        updates: &[Endpoint],
    ) -> Result<(), BunnyError> {
        for update in updates {
            let tuple = identifiers.get(&update.dns_name).ok_or_else(|| {
                ErrorContext::new("UpdateEndpoints")
                    .with("dns_name", &update.dns_name)
                    .wrap(BunnyErrorKind::RecordNotFound(update.dns_name.clone()))
            })?;

            let record = endpoint_to_update_request(update);
            self.api
                .update_record(tuple.zone_id, tuple.record_id, record)
                .await?;

            info!(
                zone_id = tuple.zone_id,
                record_id = tuple.record_id,
                name = %update.dns_name,
                "record updated"
            );
        }

        Ok(())
    }

    /// Logs the full intended effect of the change set, including identifier
    /// resolution for deletes and updates, without issuing a single
    /// mutating call.
    async fn apply_changes_dry_run(&self, changes: &Changes) -> Result<(), BunnyError> {
        for ep in &changes.create {
            info!(
                name = %ep.dns_name,
                r#type = %ep.record_type,
                value = ?ep.targets,
                ttl = ep.record_ttl,
                "DRY RUN: create record"
            );
        }

        if changes.delete.is_empty() && changes.update_old.is_empty() {
            return Ok(());
        }

        let mut dns_names: Vec<String> =
            changes.delete.iter().map(|ep| ep.dns_name.clone()).collect();
        dns_names.extend(changes.update_old.iter().map(|ep| ep.dns_name.clone()));

        let identifiers = self.fetch_identifiers(&dns_names).await?;

        for ep in &changes.delete {
            match identifiers.get(&ep.dns_name) {
                Some(tuple) => info!(
                    zone_id = tuple.zone_id,
                    record_id = tuple.record_id,
                    name = %ep.dns_name,
                    r#type = %ep.record_type,
                    "DRY RUN: delete record"
                ),
                None => info!(
                    name = %ep.dns_name,
                    r#type = %ep.record_type,
                    "DRY RUN: delete record (would skip, not found in Bunny API)"
                ),
            }
        }

        for ep in &changes.update_old {
            let Some(tuple) = identifiers.get(&ep.dns_name) else {
                info!(
                    name = %ep.dns_name,
                    r#type = %ep.record_type,
                    "DRY RUN: update record (would skip, not found in Bunny API)"
                );
                continue;
            };

            let new = changes
                .update_new
                .iter()
                .find(|n| n.dns_name == ep.dns_name && n.record_type == ep.record_type);

            info!(
                zone_id = tuple.zone_id,
                record_id = tuple.record_id,
                name = %ep.dns_name,
                current_value = ?ep.targets,
                updated_value = ?new.map(|n| &n.targets),
                updated_ttl = new.and_then(|n| n.record_ttl),
                "DRY RUN: update record"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl Provider for BunnyProvider {
    fn domain_filter(&self) -> DomainFilter {
        self.filter.clone()
    }

    async fn records(&self) -> Result<Vec<Endpoint>, Error> {
        let zones = self.fetch_zones().await.map_err(|err| {
            error!(error = %err, "failed to fetch zones");
            map_error(err)
        })?;

        let mut endpoints = Vec::new();
        for zone in &zones {
            for record in &zone.records {
                // Record types external-dns cannot express are skipped, not
                // reported as errors.
                if !record.record_type.supported() {
                    continue;
                }
                endpoints.push(record_to_endpoint(&zone.domain, record));
            }
        }

        Ok(endpoints)
    }

    /// Applies creates, then deletes, then updates, failing fast on the
    /// first error with no retry and no rollback: a failed apply leaves the
    /// remote zone partially mutated and the caller gets the first error.
    async fn apply_changes(&self, changes: Changes) -> Result<(), Error> {
        if !changes.has_changes() {
            debug!("skipping request to apply changes because no changes are present");
            return Ok(());
        }

        if self.options.dry_run {
            return self.apply_changes_dry_run(&changes).await.map_err(map_error);
        }

        self.create_endpoints(&changes.create)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to create endpoints");
                map_error(err)
            })?;

        // Without deletes or update-olds there is nothing left that needs
        // identifier resolution, so skip the extra listing.
        if changes.delete.is_empty() && changes.update_old.is_empty() {
            return Ok(());
        }

        let mut dns_names: Vec<String> =
            changes.delete.iter().map(|ep| ep.dns_name.clone()).collect();
        dns_names.extend(changes.update_old.iter().map(|ep| ep.dns_name.clone()));

        let identifiers = self.fetch_identifiers(&dns_names).await.map_err(|err| {
            error!(error = %err, "failed to fetch identifiers");
            map_error(err)
        })?;

        self.delete_endpoints(&identifiers, &changes.delete)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to delete endpoints");
                map_error(err)
            })?;

        self.update_endpoints(&identifiers, &changes.update_new)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to update endpoints");
                map_error(err)
            })?;

        Ok(())
    }

    /// Copies the annotations and labels of matching live endpoints onto the
    /// incoming candidates (live values win on collision) so that
    /// provider-defaulted annotations do not show up as unwanted churn in
    /// the change plan and ownership labels survive adjustment.
    async fn adjust_endpoints(&self, mut endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, Error> {
        let fetched = self.records().await?;

        for editing in &mut endpoints {
            for checked in &fetched {
                if editing.key() == checked.key() {
                    merge_live_endpoint(editing, checked);
                }
            }
        }

        Ok(endpoints)
    }
}

fn merge_live_endpoint(editing: &mut Endpoint, checked: &Endpoint) {
    for prop in &checked.provider_specific {
        editing.set_provider_specific(&prop.name, prop.value.clone());
    }
    for (key, value) in &checked.labels {
        editing.labels.insert(key.clone(), value.clone());
    }
}

fn domain_filter_from_options(options: &Options) -> Result<DomainFilter, Error> {
    if !options.include_domains_regexp.is_empty() || !options.exclude_domains_regexp.is_empty() {
        return DomainFilter::from_regex(
            &options.include_domains_regexp,
            &options.exclude_domains_regexp,
        );
    }

    Ok(DomainFilter::with_exclusions(
        options.include_domains.clone(),
        options.exclude_domains.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_record_components_longest_suffix_wins() {
        // Pinned tie-break: both zones match, the longer suffix is chosen.
        let known = domains(&["example.com", "b.example.com"]);
        let (record, domain) = extract_record_components(&known, "a.b.example.com").unwrap();
        assert_eq!(record, "a");
        assert_eq!(domain, "b.example.com");

        // Order of the known list must not matter.
        let known = domains(&["b.example.com", "example.com"]);
        let (record, domain) = extract_record_components(&known, "a.b.example.com").unwrap();
        assert_eq!(record, "a");
        assert_eq!(domain, "b.example.com");
    }

    #[test]
    fn test_extract_record_components_apex() {
        let known = domains(&["example.com"]);
        let (record, domain) = extract_record_components(&known, "example.com").unwrap();
        assert_eq!(record, "");
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn test_extract_record_components_requires_label_boundary() {
        let known = domains(&["example.com"]);
        assert!(extract_record_components(&known, "badexample.com").is_none());
    }

    #[test]
    fn test_extract_record_components_no_match() {
        let known = domains(&["example.com"]);
        assert!(extract_record_components(&known, "foo.example.org").is_none());
        assert!(extract_record_components(&[], "foo.example.com").is_none());
    }

    #[test]
    fn test_zone_cache() {
        let cache = ZoneCache::new();
        assert_eq!(cache.lookup("example.com"), None);

        cache.insert("example.com", 11);
        cache.insert("example.org", 12);
        assert_eq!(cache.lookup("example.com"), Some(11));

        // Repopulation overwrites whole entries.
        cache.insert("example.com", 13);
        assert_eq!(cache.lookup("example.com"), Some(13));

        let mut all = cache.domains();
        all.sort();
        assert_eq!(all, domains(&["example.com", "example.org"]));
    }

    #[test]
    fn test_merge_live_endpoint_copies_annotations_and_labels() {
        let mut editing = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        editing.set_provider_specific("webhook/bunny-weight", "70");
        editing
            .labels
            .insert("owner".to_string(), "candidate".to_string());

        let mut checked = Endpoint::with_ttl("www.example.com", "A", 300, "1.2.3.4");
        checked.set_provider_specific("webhook/bunny-weight", "50");
        checked.set_provider_specific("webhook/bunny-disabled", "false");
        checked
            .labels
            .insert("owner".to_string(), "live".to_string());
        checked
            .labels
            .insert("resource".to_string(), "ingress/web".to_string());

        merge_live_endpoint(&mut editing, &checked);

        // The live side wins on collision, in both maps.
        assert_eq!(
            editing.get_provider_specific("webhook/bunny-weight"),
            Some("50")
        );
        assert_eq!(
            editing.get_provider_specific("webhook/bunny-disabled"),
            Some("false")
        );
        assert_eq!(editing.labels.get("owner").map(String::as_str), Some("live"));
        assert_eq!(
            editing.labels.get("resource").map(String::as_str),
            Some("ingress/web")
        );
    }

    #[test]
    fn test_domain_filter_from_options_regex_wins() {
        let options = Options {
            include_domains: vec!["ignored.com".to_string()],
            include_domains_regexp: r"\.example\.com$".to_string(),
            ..Default::default()
        };
        let filter = domain_filter_from_options(&options).unwrap();
        assert!(filter.matches("foo.example.com"));
        assert!(!filter.matches("ignored.com"));
    }
}
