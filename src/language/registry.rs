//! Language registry: the two language universes and alias resolution.
//!
//! Holds the static alias tables for the offline engine and the cloud
//! pipeline, and a reverse map from every lowercase display name and code to
//! its canonical code. Uses a `OnceLock` singleton so the tables are built
//! once on first access and stay immutable thereafter.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// The translation back end a language belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Universe {
    /// Locally installed engine, one package per language pair.
    Offline,
    /// Remote pipeline API.
    Cloud,
}

/// One display-name/code pair in a universe.
#[derive(Debug, Clone)]
pub struct LanguageAlias {
    /// English display name (e.g., "German", "Hindi")
    pub name: &'static str,

    /// Canonical code used by the engines (e.g., "de", "hi", "gom")
    pub code: &'static str,

    /// Which back end supports the language
    pub universe: Universe,
}

/// Language registry singleton.
pub struct LanguageRegistry {
    lookup: HashMap<String, &'static str>,
    offline: HashSet<&'static str>,
    cloud: HashSet<&'static str>,
}

/// Code shared by both universes, used as the bridge between them.
pub const PIVOT_CODE: &str = "en";

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

const OFFLINE_LANGUAGES: &[(&str, &str)] = &[
    ("Arabic", "ar"),
    ("Azerbaijani", "az"),
    ("Catalan", "ca"),
    ("Chinese", "zh"),
    ("Czech", "cs"),
    ("Danish", "da"),
    ("Dutch", "nl"),
    ("English", "en"),
    ("Esperanto", "eo"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "el"),
    ("Hebrew", "he"),
    ("Hungarian", "hu"),
    ("Indonesian", "id"),
    ("Irish", "ga"),
    ("Italian", "it"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Persian", "fa"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Russian", "ru"),
    ("Slovak", "sk"),
    ("Spanish", "es"),
    ("Swedish", "sv"),
    ("Turkish", "tr"),
    ("Ukrainian", "uk"),
];

const CLOUD_LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Hindi", "hi"),
    ("Gom", "gom"),
    ("Kannada", "kn"),
    ("Dogri", "doi"),
    ("Bodo", "brx"),
    ("Urdu", "ur"),
    ("Tamil", "ta"),
    ("Kashmiri", "ks"),
    ("Assamese", "as"),
    ("Bengali", "bn"),
    ("Marathi", "mr"),
    ("Sindhi", "sd"),
    ("Maithili", "mai"),
    ("Punjabi", "pa"),
    ("Malayalam", "ml"),
    ("Manipuri", "mni"),
    ("Telugu", "te"),
    ("Sanskrit", "sa"),
    ("Nepali", "ne"),
    ("Santali", "sat"),
    ("Gujarati", "gu"),
    ("Odia", "or"),
];

impl LanguageRegistry {
    /// Get the global registry instance, building it on first call.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry::from_aliases(default_aliases()))
    }

    /// Build a registry from an explicit alias list.
    ///
    /// The reverse map is filled eagerly: both the lowercase display name and
    /// the lowercase code of each alias point at the canonical code.
    pub fn from_aliases(aliases: Vec<LanguageAlias>) -> Self {
        let mut lookup = HashMap::new();
        let mut offline = HashSet::new();
        let mut cloud = HashSet::new();

        for alias in &aliases {
            lookup.insert(alias.name.to_lowercase(), alias.code);
            lookup.insert(alias.code.to_lowercase(), alias.code);
            match alias.universe {
                Universe::Offline => offline.insert(alias.code),
                Universe::Cloud => cloud.insert(alias.code),
            };
        }

        Self {
            lookup,
            offline,
            cloud,
        }
    }

    /// Resolve a display name or code, in any letter case, to its canonical code.
    ///
    /// Returns `None` for identifiers that belong to neither universe.
    pub fn resolve(&self, identifier: &str) -> Option<&'static str> {
        self.lookup.get(&identifier.trim().to_lowercase()).copied()
    }

    /// Whether `code` (case-insensitive) is supported by the given universe.
    pub fn supports(&self, universe: Universe, code: &str) -> bool {
        let code = code.to_lowercase();
        match universe {
            Universe::Offline => self.offline.contains(code.as_str()),
            Universe::Cloud => self.cloud.contains(code.as_str()),
        }
    }

    /// Codes supported by one universe.
    pub fn codes(&self, universe: Universe) -> &HashSet<&'static str> {
        match universe {
            Universe::Offline => &self.offline,
            Universe::Cloud => &self.cloud,
        }
    }
}

fn default_aliases() -> Vec<LanguageAlias> {
    let offline = OFFLINE_LANGUAGES.iter().map(|&(name, code)| LanguageAlias {
        name,
        code,
        universe: Universe::Offline,
    });
    let cloud = CLOUD_LANGUAGES.iter().map(|&(name, code)| LanguageAlias {
        name,
        code,
        universe: Universe::Cloud,
    });
    offline.chain(cloud).collect()
}
