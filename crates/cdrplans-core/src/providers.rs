//! Provider directory: the brand name → CDR base URL mapping.
//!
//! The directory is published by the regulator as a PDF; extracting the
//! table is handled upstream. This module loads the extracted result from a
//! CSV file (`Brand Name`, `Retailer Base URI` columns) or a YAML file
//! (`providers: [{brand_name, base_url}]`) and validates it.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Normalize a brand name into its directory-safe key.
///
/// Lowercases, collapses every whitespace run into a single `_` and replaces
/// path separators with `_`. `"Acme  Energy"` and `"acme energy"` map to the
/// same key, `acme_energy`.
#[must_use]
pub fn brand_key(brand_name: &str) -> String {
    brand_name
        .split_whitespace()
        .map(|part| part.to_lowercase().replace(['/', '\\'], "_"))
        .collect::<Vec<_>>()
        .join("_")
}

/// An energy retailer exposing the CDR plans API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub brand_name: String,
    /// Always ends with exactly one `/`.
    pub base_url: String,
}

impl Provider {
    /// Build a provider, normalizing the base URL to end with a single `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the brand name normalizes to an
    /// unusable key or the base URL is not an `http(s)` URL.
    pub fn new(brand_name: &str, base_url: &str) -> Result<Self, ConfigError> {
        let brand_name = brand_name.trim();
        let key = brand_key(brand_name);
        if key.is_empty() || key == "." || key == ".." {
            return Err(ConfigError::Validation(format!(
                "brand name {brand_name:?} does not produce a usable directory key"
            )));
        }

        let base_url = base_url.trim();
        let lower = base_url.to_ascii_lowercase();
        let authority = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"));
        if authority.map_or(true, |rest| rest.trim_matches('/').is_empty()) {
            return Err(ConfigError::Validation(format!(
                "brand '{brand_name}' has invalid base URL {base_url:?}; expected http(s)://host/"
            )));
        }

        Ok(Self {
            brand_name: brand_name.to_string(),
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        })
    }

    /// The directory-safe key for this provider's artifacts.
    #[must_use]
    pub fn key(&self) -> String {
        brand_key(&self.brand_name)
    }
}

/// A validated set of providers with unique brand keys.
#[derive(Debug, Clone, Default)]
pub struct ProviderDirectory {
    providers: Vec<Provider>,
}

impl ProviderDirectory {
    /// Build a directory from already-constructed providers.
    ///
    /// Entries whose key and base URL both repeat an earlier entry are
    /// dropped. Two entries sharing a key but pointing at different base URLs
    /// are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on a conflicting key collision.
    pub fn from_providers(providers: Vec<Provider>) -> Result<Self, ConfigError> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut unique: Vec<Provider> = Vec::with_capacity(providers.len());

        for provider in providers {
            let key = provider.key();
            if let Some(&index) = seen.get(&key) {
                let existing = &unique[index];
                if existing.base_url == provider.base_url {
                    continue;
                }
                return Err(ConfigError::Validation(format!(
                    "brand key '{key}' is shared by '{}' ({}) and '{}' ({})",
                    existing.brand_name, existing.base_url, provider.brand_name, provider.base_url
                )));
            }
            seen.insert(key, unique.len());
            unique.push(provider);
        }

        Ok(Self { providers: unique })
    }

    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    #[must_use]
    pub fn into_providers(self) -> Vec<Provider> {
        self.providers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Look up a provider by brand name, ignoring case and spacing differences.
    #[must_use]
    pub fn find(&self, brand_name: &str) -> Option<&Provider> {
        let key = brand_key(brand_name);
        self.providers.iter().find(|p| p.key() == key)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Brand Name", default)]
    brand_name: String,
    #[serde(rename = "Retailer Base URI", default)]
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct YamlEntry {
    brand_name: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct YamlFile {
    providers: Vec<YamlEntry>,
}

/// Parse the CSV form of the provider directory.
///
/// Rows with an empty brand name or base URL are skipped, as are rows whose
/// URL is a `placeholder` entry the regulator lists for retailers not yet
/// live. Extra columns are ignored.
///
/// # Errors
///
/// Returns [`ConfigError::ProvidersCsv`] if the CSV is malformed or lacks the
/// required headers, and [`ConfigError::Validation`] for invalid entries.
pub fn parse_providers_csv<R: Read>(reader: R) -> Result<ProviderDirectory, ConfigError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["Brand Name", "Retailer Base URI"] {
        if !headers.iter().any(|h| h == required) {
            return Err(ConfigError::Validation(format!(
                "provider CSV is missing the '{required}' column"
            )));
        }
    }

    let mut providers = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row?;
        if row.brand_name.is_empty()
            || row.base_url.is_empty()
            || row.base_url.to_ascii_lowercase().contains("placeholder")
        {
            continue;
        }
        providers.push(Provider::new(&row.brand_name, &row.base_url)?);
    }

    ProviderDirectory::from_providers(providers)
}

/// Parse the YAML form of the provider directory.
///
/// # Errors
///
/// Returns [`ConfigError::ProvidersYaml`] if the document does not parse and
/// [`ConfigError::Validation`] for invalid entries.
pub fn parse_providers_yaml(content: &str) -> Result<ProviderDirectory, ConfigError> {
    let file: YamlFile = serde_yaml::from_str(content)?;
    let providers = file
        .providers
        .iter()
        .map(|entry| Provider::new(&entry.brand_name, &entry.base_url))
        .collect::<Result<Vec<_>, _>>()?;
    ProviderDirectory::from_providers(providers)
}

/// Load and validate the provider directory, picking the parser by file
/// extension (`.yaml`/`.yml` → YAML, anything else → CSV).
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_providers(path: &Path) -> Result<ProviderDirectory, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        parse_providers_yaml(&content)
    } else {
        parse_providers_csv(content.as_bytes())
    }
}

#[cfg(test)]
#[path = "providers_test.rs"]
mod tests;
