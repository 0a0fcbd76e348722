use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::manager::manager::IManager;
use crate::manager::managererror::ManagerError;
use crate::time::holiday::holiday::ResolvedHoliday;
use crate::time::jurisdiction::holidayprovider::HolidayProvider;
use crate::time::jurisdiction::jurisdiction::JurisdictionProvider;
use crate::time::jurisdiction::jurisdictionmanager::{JurisdictionLoader, JurisdictionManager};
use crate::time::locale::LocaleResolver;


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    locale: LocaleResolver,
    jurisdictions: Vec<serde_json::Value>
}

/// A loaded holiday catalog: locale settings and every jurisdiction.
pub struct Configuration {
    locale_resolver: LocaleResolver,
    jurisdiction_manager: JurisdictionManager
}


impl Configuration {
    pub fn from_json_value(json_value: serde_json::Value) -> Result<Configuration, ManagerError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_value(json_value)?;
        let jurisdiction_manager = JurisdictionLoader.from_json_vec(&json_prop.jurisdictions, &json_prop.locale)?;
        info!(
            jurisdictions = jurisdiction_manager.len(),
            default_locale = %json_prop.locale.default_locale(),
            "loaded holiday catalog"
        );
        Ok(Configuration {
            locale_resolver: json_prop.locale,
            jurisdiction_manager
        })
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, ManagerError> {
        Configuration::from_json_value(serde_json::from_str(json)?)
    }

    pub fn from_reader<P: AsRef<Path>>(file_path: P) -> Result<Configuration, ManagerError> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|source| ManagerError::Io {
            path: path.display().to_string(),
            source
        })?;
        let reader = BufReader::new(file);
        Configuration::from_json_value(serde_json::from_reader(reader)?)
    }

    pub fn locale_resolver(&self) -> &LocaleResolver {
        &self.locale_resolver
    }

    pub fn jurisdiction_manager(&self) -> &JurisdictionManager {
        &self.jurisdiction_manager
    }

    pub fn jurisdiction(&self, name: &str) -> Result<Arc<JurisdictionProvider>, ManagerError> {
        self.jurisdiction_manager.get(name)
    }

    /// Holidays of `name` in `year`, in date order, with names resolved for
    /// `locale` (the default locale when `None`).
    pub fn holidays(&self, name: &str, year: i32, locale: Option<&str>) -> Result<Vec<ResolvedHoliday>, ManagerError> {
        let locale = locale.unwrap_or(self.locale_resolver.default_locale());
        let collection = self.jurisdiction(name)?.compute(year)?;
        Ok(collection.resolve(&self.locale_resolver, locale)?)
    }
}
