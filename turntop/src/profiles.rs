//! Connection profiles: load/save simple JSON mapping of profile name -> { url, top_n, quantum }
//! Stored under XDG config dir: $XDG_CONFIG_HOME/turntop/profiles.json (fallback ~/.config/turntop/profiles.json)

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("turntop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("turntop")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).map_err(io::Error::other)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq)]
pub enum ResolveProfile {
    /// Use the provided runtime inputs (persisted by the caller when a profile name was given)
    Direct(ProfileEntry),
    /// Loaded from existing profile entry, with command-line overrides applied
    Loaded(ProfileEntry),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments)
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub url: Option<String>,
    pub top_n: Option<u32>,
    pub quantum: Option<f64>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.url, self.profile_name) {
            // URL given -> direct (maybe later saved by caller)
            (Some(url), _) => ResolveProfile::Direct(ProfileEntry {
                url,
                top_n: self.top_n,
                quantum: self.quantum,
            }),
            // Only profile name given -> try load
            (None, Some(name)) => match pf.profiles.get(&name) {
                Some(entry) => ResolveProfile::Loaded(ProfileEntry {
                    url: entry.url.clone(),
                    top_n: self.top_n.or(entry.top_n),
                    quantum: self.quantum.or(entry.quantum),
                }),
                None => ResolveProfile::PromptCreate(name),
            },
            // Nothing provided -> maybe prompt select if profiles exist
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with(name: &str, entry: ProfileEntry) -> ProfilesFile {
        let mut pf = ProfilesFile::default();
        pf.profiles.insert(name.to_string(), entry);
        pf
    }

    #[test]
    fn url_wins_over_profile() {
        let pf = file_with("prod", ProfileEntry { url: "http://a:1".into(), ..Default::default() });
        let req = ProfileRequest {
            profile_name: Some("prod".into()),
            url: Some("http://b:2".into()),
            top_n: Some(10),
            quantum: None,
        };
        assert_eq!(
            req.resolve(&pf),
            ResolveProfile::Direct(ProfileEntry {
                url: "http://b:2".into(),
                top_n: Some(10),
                quantum: None
            })
        );
    }

    #[test]
    fn cli_values_override_loaded_profile() {
        let pf = file_with(
            "prod",
            ProfileEntry { url: "http://a:1".into(), top_n: Some(20), quantum: Some(2.0) },
        );
        let req = ProfileRequest {
            profile_name: Some("prod".into()),
            url: None,
            top_n: None,
            quantum: Some(5.0),
        };
        assert_eq!(
            req.resolve(&pf),
            ResolveProfile::Loaded(ProfileEntry {
                url: "http://a:1".into(),
                top_n: Some(20),
                quantum: Some(5.0)
            })
        );
    }

    #[test]
    fn unknown_profile_prompts_create_and_empty_resolves_none() {
        let req = ProfileRequest { profile_name: Some("new".into()), url: None, top_n: None, quantum: None };
        assert_eq!(req.resolve(&ProfilesFile::default()), ResolveProfile::PromptCreate("new".into()));
        let req = ProfileRequest { profile_name: None, url: None, top_n: None, quantum: None };
        assert_eq!(req.resolve(&ProfilesFile::default()), ResolveProfile::None);
    }
}
