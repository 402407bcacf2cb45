//! # Implementation Registry
//!
//! The set of implementations under test, loaded from manifest files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::endpoint::Endpoint;
use crate::error::invalid;
use crate::manifest::Manifest;
use crate::Result;

/// An implementation under test, with clients for each of its endpoints.
#[derive(Clone, Debug)]
pub struct Implementation {
    /// Unique name of the implementation.
    pub name: String,

    /// Longer, human-readable name.
    pub implementation: Option<String>,

    /// Issuer endpoints.
    pub issuers: Vec<Endpoint>,

    /// Verifier endpoints.
    pub verifiers: Vec<Endpoint>,
}

impl Implementation {
    /// Bind a manifest to an HTTP client.
    #[must_use]
    pub fn new(manifest: Manifest, http: &reqwest::Client) -> Self {
        Self {
            name: manifest.name,
            implementation: manifest.implementation,
            issuers: manifest.issuers.into_iter().map(|s| Endpoint::new(s, http.clone())).collect(),
            verifiers: manifest
                .verifiers
                .into_iter()
                .map(|s| Endpoint::new(s, http.clone()))
                .collect(),
        }
    }

    /// The first issuer endpoint carrying `tag`.
    #[must_use]
    pub fn issuer(&self, tag: &str) -> Option<&Endpoint> {
        self.issuers.iter().find(|e| e.has_tag(tag))
    }

    /// The first verifier endpoint carrying `tag`.
    #[must_use]
    pub fn verifier(&self, tag: &str) -> Option<&Endpoint> {
        self.verifiers.iter().find(|e| e.has_tag(tag))
    }
}

/// Implementations under test, ordered by name.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    implementations: BTreeMap<String, Implementation>,
}

impl Registry {
    /// Build a registry from already-parsed manifests.
    ///
    /// # Errors
    ///
    /// Returns an error if two manifests share a name or a manifest has no
    /// name.
    pub fn from_manifests(
        manifests: impl IntoIterator<Item = Manifest>, http: &reqwest::Client,
    ) -> Result<Self> {
        let mut registry = Self::default();
        for manifest in manifests {
            registry.insert(Implementation::new(manifest, http))?;
        }
        Ok(registry)
    }

    /// Load manifests from `path`, which may be a JSON file holding one
    /// manifest or an array of manifests, or a directory of such files.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or if two
    /// manifests share a name.
    pub fn load(path: impl AsRef<Path>, http: &reqwest::Client) -> Result<Self> {
        let path = path.as_ref();

        let mut files = if path.is_dir() {
            let entries =
                fs::read_dir(path).map_err(|e| invalid!("reading {}: {e}", path.display()))?;
            entries
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect::<Vec<_>>()
        } else {
            vec![path.to_path_buf()]
        };
        files.sort();

        let mut manifests = vec![];
        for file in files {
            let contents =
                fs::read_to_string(&file).map_err(|e| invalid!("reading {}: {e}", file.display()))?;
            manifests.extend(parse(&contents).map_err(|e| invalid!("{}: {e}", file.display()))?);
        }
        tracing::debug!(count = manifests.len(), path = %path.display(), "loaded manifests");

        Self::from_manifests(manifests, http)
    }

    /// Add an implementation.
    ///
    /// # Errors
    ///
    /// Returns an error if the implementation has no name or one with the
    /// same name is already registered.
    pub fn insert(&mut self, implementation: Implementation) -> Result<()> {
        if implementation.name.is_empty() {
            return Err(invalid!("implementation has no name"));
        }
        if self.implementations.contains_key(&implementation.name) {
            return Err(invalid!("duplicate implementation: {}", implementation.name));
        }
        self.implementations.insert(implementation.name.clone(), implementation);
        Ok(())
    }

    /// Keep only the implementations accepted by `predicate`.
    #[must_use]
    pub fn filter(self, predicate: impl Fn(&Implementation) -> bool) -> Self {
        Self {
            implementations: self
                .implementations
                .into_iter()
                .filter(|(_, implementation)| predicate(implementation))
                .collect(),
        }
    }

    /// Limit how long access token requests may take, for every endpoint.
    #[must_use]
    pub fn token_timeout(mut self, timeout: Duration) -> Self {
        for implementation in self.implementations.values_mut() {
            for endpoint in implementation.issuers.iter_mut().chain(&mut implementation.verifiers) {
                endpoint.token_timeout = timeout;
            }
        }
        self
    }

    /// Keep only implementations with an issuer carrying `tag`.
    #[must_use]
    pub fn tagged(self, tag: &str) -> Self {
        self.filter(|implementation| implementation.issuers.iter().any(|e| e.has_tag(tag)))
    }

    /// Keep only the named implementations. An empty list keeps all.
    #[must_use]
    pub fn only(self, names: &[String]) -> Self {
        if names.is_empty() {
            return self;
        }
        for name in names {
            if !self.implementations.contains_key(name) {
                tracing::warn!(name = name.as_str(), "unknown implementation");
            }
        }
        self.filter(|implementation| names.contains(&implementation.name))
    }

    /// Look up an implementation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Implementation> {
        self.implementations.get(name)
    }

    /// Iterate over implementations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Implementation> {
        self.implementations.values()
    }

    /// Implementation names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.implementations.keys().map(String::as_str).collect()
    }

    /// Number of implementations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type IntoIter = std::collections::btree_map::Values<'a, String, Implementation>;
    type Item = &'a Implementation;

    fn into_iter(self) -> Self::IntoIter {
        self.implementations.values()
    }
}

/// Parse a file holding a single manifest or an array of manifests.
fn parse(contents: &str) -> serde_json::Result<Vec<Manifest>> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    if value.is_array() { serde_json::from_value(value) } else { Ok(vec![serde_json::from_value(value)?]) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::EndpointSettings;

    fn manifest(name: &str, tag: &str) -> Manifest {
        Manifest {
            name: name.into(),
            implementation: None,
            issuers: vec![
                EndpointSettings::new(format!("https://{name}.example/credentials/issue")).tag(tag),
            ],
            verifiers: vec![
                EndpointSettings::new(format!("https://{name}.example/credentials/verify")).tag(tag),
            ],
        }
    }

    #[test]
    fn tagged() {
        let http = reqwest::Client::new();
        let registry = Registry::from_manifests(
            [
                manifest("Charlie", "StatusList2021"),
                manifest("Alpha", "StatusList2021"),
                manifest("Bravo", "RevocationList2020"),
            ],
            &http,
        )
        .expect("should build registry");

        let filtered = registry.tagged("StatusList2021");
        assert_eq!(filtered.names(), vec!["Alpha", "Charlie"]);

        let alpha = filtered.get("Alpha").expect("should have Alpha");
        assert!(alpha.issuer("StatusList2021").is_some());
        assert!(alpha.verifier("RevocationList2020").is_none());
    }

    #[test]
    fn only() {
        let http = reqwest::Client::new();
        let registry = Registry::from_manifests(
            [manifest("Alpha", "StatusList2021"), manifest("Bravo", "StatusList2021")],
            &http,
        )
        .expect("should build registry");

        assert_eq!(registry.clone().only(&[]).len(), 2);
        assert_eq!(registry.only(&["Bravo".into(), "Zulu".into()]).names(), vec!["Bravo"]);
    }

    #[test]
    fn duplicate_name() {
        let http = reqwest::Client::new();
        let err = Registry::from_manifests(
            [manifest("Alpha", "StatusList2021"), manifest("Alpha", "StatusList2021")],
            &http,
        )
        .expect_err("should reject duplicates");
        assert!(err.to_string().contains("duplicate implementation: Alpha"));
    }

    #[test]
    fn parse_array_or_object() {
        let one = parse(r#"{"name": "Alpha"}"#).expect("should parse object");
        assert_eq!(one.len(), 1);

        let many = parse(r#"[{"name": "Alpha"}, {"name": "Bravo"}]"#).expect("should parse array");
        assert_eq!(many.len(), 2);

        assert!(parse(r#"{"issuers": []}"#).is_err());
    }
}
