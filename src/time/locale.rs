//! Locale handling for holiday display names.
//!
//! Names are stored per locale code (`en`, `fr_CA`, ...). Resolution walks a
//! fallback chain: the requested locale, its language, the default locale,
//! and the default locale's language.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};

pub const DEFAULT_LOCALE: &str = "en_US";

const BUILTIN_LOCALES: [&str; 16] = [
    "en", "en_US", "en_CA", "en_GB", "en_AU",
    "fr", "fr_FR", "fr_CA", "fr_BE",
    "de", "de_DE", "es", "es_ES", "it", "nl", "ja"
];

/// Canonical form of a locale code: `fr-ca` becomes `fr_CA`.
pub fn normalize_locale(locale: &str) -> String {
    let mut parts = locale.trim().splitn(2, ['_', '-']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    match parts.next() {
        Some(region) if !region.is_empty() => format!("{}_{}", language, region.to_ascii_uppercase()),
        _ => language
    }
}

/// Builds a name map from `(locale, name)` pairs, normalizing the locales.
pub fn localized_names<I, L, N>(entries: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (L, N)>,
    L: AsRef<str>,
    N: Into<String> {
    entries
        .into_iter()
        .map(|(locale, name)| (normalize_locale(locale.as_ref()), name.into()))
        .collect()
}

/// Language part of a normalized locale code.
pub fn language_of(locale: &str) -> &str {
    locale.split('_').next().unwrap_or(locale)
}

#[derive(Deserialize)]
struct LocaleResolverJsonProp {
    #[serde(default = "default_locale")]
    default_locale: String,
    #[serde(default)]
    supported_locales: Vec<String>
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_owned()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocaleResolverJsonProp")]
pub struct LocaleResolver {
    default_locale: String,
    supported_locales: BTreeSet<String>
}

impl LocaleResolver {
    /// An empty `supported_locales` selects the built-in list. The default
    /// locale is always supported.
    pub fn new<I, S>(default_locale: &str, supported_locales: I) -> LocaleResolver
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> {
        let default_locale = normalize_locale(default_locale);
        let mut supported: BTreeSet<String> = supported_locales
            .into_iter()
            .map(|locale| normalize_locale(locale.as_ref()))
            .collect();
        if supported.is_empty() {
            supported.extend(BUILTIN_LOCALES.iter().map(|locale| locale.to_string()));
        }
        supported.insert(default_locale.clone());
        LocaleResolver { default_locale, supported_locales: supported }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn supported_locales(&self) -> &BTreeSet<String> {
        &self.supported_locales
    }

    /// A locale is known when it, or its language, is supported.
    pub fn is_known(&self, locale: &str) -> bool {
        let locale = normalize_locale(locale);
        self.supported_locales.contains(&locale)
            || self.supported_locales.contains(language_of(&locale))
    }

    /// Locales tried, in order, when resolving a name for `locale`.
    pub fn fallback_chain(&self, locale: &str) -> HolidayResult<Vec<String>> {
        let requested = normalize_locale(locale);
        if !self.is_known(&requested) {
            return Err(HolidayError::UnknownLocale { locale: locale.to_owned() });
        }

        let candidates = [
            requested.as_str(),
            language_of(&requested),
            self.default_locale.as_str(),
            language_of(&self.default_locale)
        ];

        let mut chain: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !chain.iter().any(|c| c == candidate) {
                chain.push(candidate.to_owned());
            }
        }
        Ok(chain)
    }

    /// Display name for `locale`. When no locale of the chain has a name, the
    /// first name in locale order is used.
    pub fn resolve<'a>(&self, names: &'a BTreeMap<String, String>, locale: &str) -> HolidayResult<&'a str> {
        let chain = self.fallback_chain(locale)?;
        let resolved = chain
            .iter()
            .find_map(|candidate| names.get(candidate))
            .or_else(|| names.values().next());
        Ok(resolved.map(String::as_str).unwrap_or_default())
    }
}

impl Default for LocaleResolver {
    fn default() -> Self {
        LocaleResolver::new(DEFAULT_LOCALE, BUILTIN_LOCALES)
    }
}

impl From<LocaleResolverJsonProp> for LocaleResolver {
    fn from(json_prop: LocaleResolverJsonProp) -> Self {
        LocaleResolver::new(&json_prop.default_locale, json_prop.supported_locales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries.iter().map(|(l, n)| (l.to_string(), n.to_string())).collect()
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("fr-ca"), "fr_CA");
        assert_eq!(normalize_locale("en_US"), "en_US");
        assert_eq!(normalize_locale("EN"), "en");
    }

    #[test]
    fn test_fallback_chain_walks_region_language_default() {
        let resolver = LocaleResolver::default();
        assert_eq!(
            resolver.fallback_chain("fr_CA").unwrap(),
            vec!["fr_CA", "fr", "en_US", "en"]
        );
        assert_eq!(resolver.fallback_chain("en").unwrap(), vec!["en", "en_US"]);
    }

    #[test]
    fn test_resolve_prefers_requested_locale() {
        let resolver = LocaleResolver::default();
        let names = names(&[("en", "Victoria Day"), ("fr", "Fête de la Reine")]);
        assert_eq!(resolver.resolve(&names, "fr_CA").unwrap(), "Fête de la Reine");
        assert_eq!(resolver.resolve(&names, "en_CA").unwrap(), "Victoria Day");
    }

    #[test]
    fn test_resolve_falls_back_to_default_locale() {
        let resolver = LocaleResolver::default();
        let names = names(&[("en", "Natal Holiday")]);
        assert_eq!(resolver.resolve(&names, "fr").unwrap(), "Natal Holiday");
    }

    #[test]
    fn test_resolve_uses_first_name_when_chain_is_exhausted() {
        let resolver = LocaleResolver::default();
        let names = names(&[("nl", "Koningsdag")]);
        assert_eq!(resolver.resolve(&names, "fr").unwrap(), "Koningsdag");
    }

    #[test]
    fn test_unknown_locale_fails() {
        let resolver = LocaleResolver::new("en_US", ["en", "fr"]);
        let names = names(&[("en", "Canada Day")]);
        match resolver.resolve(&names, "xx_YY") {
            Err(HolidayError::UnknownLocale { locale }) => assert_eq!(locale, "xx_YY"),
            other => panic!("Expected UnknownLocale, got {:?}", other),
        }
    }

    #[test]
    fn test_region_of_supported_language_is_known() {
        let resolver = LocaleResolver::new("en_US", ["en", "fr"]);
        assert!(resolver.is_known("fr_BE"));
        assert!(!resolver.is_known("de_DE"));
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let resolver: LocaleResolver = serde_json::from_str("{}").unwrap();
        assert_eq!(resolver.default_locale(), DEFAULT_LOCALE);
        assert!(resolver.is_known("fr_CA"));
    }
}
