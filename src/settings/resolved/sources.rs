use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
    CliFlag(&'static str),
    Environment(&'static str),
    ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
            Self::Environment(var) => write!(f, "environment variable `{var}`"),
            Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
        }
    }
}

/// Where each validated setting came from, when it was set at all.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
    pub(crate) quiet_ms: Option<SettingSource>,
    pub(crate) suggest_min_chars: Option<SettingSource>,
    pub(crate) results_min_chars: Option<SettingSource>,
    pub(crate) sort_key: Option<SettingSource>,
    pub(crate) latitude: Option<SettingSource>,
    pub(crate) longitude: Option<SettingSource>,
    pub(crate) max_suggestions: Option<SettingSource>,
}

impl ConfigSources {
    /// Origin of `key`, falling back to the configuration key itself.
    pub(crate) fn source_for(&self, key: &'static str) -> SettingSource {
        let recorded = match key {
            "search.quiet_ms" => &self.quiet_ms,
            "search.suggest_min_chars" => &self.suggest_min_chars,
            "search.results_min_chars" => &self.results_min_chars,
            "search.sort_key" => &self.sort_key,
            "search.latitude" => &self.latitude,
            "search.longitude" => &self.longitude,
            "source.max_suggestions" => &self.max_suggestions,
            _ => &None,
        };
        recorded.clone().unwrap_or(SettingSource::ConfigKey(key))
    }
}
