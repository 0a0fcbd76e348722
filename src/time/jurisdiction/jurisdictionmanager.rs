use std::sync::Arc;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::manager::manager::{FrozenManager, IManager, ManagerBuilder};
use crate::manager::managererror::{ManagerError, parse_json_value};
use crate::manager::namedobject::NamedJsonObject;
use crate::time::holiday::ruledescriptor::RuleDescriptor;
use crate::time::holiday::substitution::SubstitutionPolicy;
use crate::time::jurisdiction::jurisdiction::JurisdictionProvider;
use crate::time::locale::LocaleResolver;
use crate::time::weekdaymask::WeekdayMask;

pub type JurisdictionManager = FrozenManager<JurisdictionProvider>;

#[derive(Deserialize)]
struct JurisdictionJsonProp {
    name: String,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    weekend_days: Option<WeekdayMask>,
    #[serde(default)]
    substitution: SubstitutionPolicy,
    #[serde(default)]
    rules: Vec<RuleDescriptor>
}

fn parse_timezone(name: &str, timezone: &str) -> Result<Tz, ManagerError> {
    timezone.parse::<Tz>().map_err(|error| ManagerError::InvalidTimezone {
        name: name.to_owned(),
        message: error.to_string()
    })
}

fn warn_unknown_locales(json_prop: &JurisdictionJsonProp, locale_resolver: &LocaleResolver) {
    for rule in json_prop.rules.iter() {
        for locale in rule.names().keys().filter(|locale| !locale_resolver.is_known(locale)) {
            warn!(
                jurisdiction = %json_prop.name,
                key = %rule.key(),
                locale = %locale,
                "holiday name uses an unsupported locale"
            );
        }
    }
}

fn build_jurisdiction(
    json_prop: JurisdictionJsonProp,
    parent: Option<Arc<JurisdictionProvider>>
) -> Result<JurisdictionProvider, ManagerError> {
    let timezone = json_prop
        .timezone
        .as_deref()
        .map(|timezone| parse_timezone(&json_prop.name, timezone))
        .transpose()?;

    let provider = match (parent, timezone) {
        (Some(parent), Some(timezone)) => JurisdictionProvider::with_parent(json_prop.name, parent).with_timezone(timezone),
        (Some(parent), None) => JurisdictionProvider::with_parent(json_prop.name, parent),
        (None, Some(timezone)) => JurisdictionProvider::new(json_prop.name, timezone),
        (None, None) => return Err(ManagerError::MissingTimezone { name: json_prop.name })
    };

    let provider = match json_prop.weekend_days {
        Some(weekend_days) => provider.with_weekend_days(weekend_days),
        None => provider
    };

    Ok(provider
        .with_substitution(json_prop.substitution)
        .with_rules(json_prop.rules))
}

/// Loader for jurisdiction catalogs.
///
/// A subdivision needs its parent to be loaded first, but catalog entries may
/// come in any order. `insert_obj_from_json` fails with
/// [`ManagerError::UnresolvedParent`] while the parent is missing, and
/// `insert_obj_from_json_vec` retries those entries round by round until
/// everything is loaded or a round makes no progress (unknown or cyclic
/// parents).
pub struct JurisdictionLoader;

impl IManager<JurisdictionProvider, LocaleResolver> for JurisdictionLoader {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<JurisdictionProvider>,
        json_value: serde_json::Value,
        locale_resolver: &LocaleResolver
    ) -> Result<(), ManagerError> {
        let named_obj: NamedJsonObject = parse_json_value(json_value.clone())?;

        // Resolve the parent before anything logs, so an entry that is
        // retried only warns on the pass that loads it.
        let parent = match named_obj.parent() {
            Some(parent_name) => Some(builder.get(parent_name).map_err(|_| ManagerError::UnresolvedParent {
                name: named_obj.name().to_owned(),
                parent: parent_name.to_owned()
            })?),
            None => None
        };

        let json_prop: JurisdictionJsonProp = parse_json_value(json_value)?;
        warn_unknown_locales(&json_prop, locale_resolver);
        let provider = build_jurisdiction(json_prop, parent)?;

        debug!(
            jurisdiction = %named_obj.name(),
            parent = ?named_obj.parent(),
            rules = provider.rules().len(),
            "loaded jurisdiction"
        );
        builder.insert(named_obj.name().to_owned(), Arc::new(provider))
    }

    fn insert_obj_from_json_vec(
        &self,
        builder: &mut ManagerBuilder<JurisdictionProvider>,
        json_vec: &[serde_json::Value],
        locale_resolver: &LocaleResolver
    ) -> Result<(), ManagerError> {
        let mut remain_indices: Vec<usize> = (0..json_vec.len()).collect();

        loop {
            let mut new_remain_indices: Vec<usize> = Vec::new();
            let mut last_error: Option<ManagerError> = None;

            for &index in remain_indices.iter() {
                match self.insert_obj_from_json(builder, json_vec[index].clone(), locale_resolver) {
                    Ok(()) => {}
                    Err(error @ ManagerError::UnresolvedParent { .. }) => {
                        new_remain_indices.push(index);
                        last_error = Some(error);
                    }
                    Err(error) => return Err(error)
                }
            }

            match last_error {
                None => return Ok(()),
                Some(error) if remain_indices == new_remain_indices => return Err(error),
                Some(_) => remain_indices = new_remain_indices
            }
        }
    }
}
