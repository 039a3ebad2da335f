use shared::Endpoint;
use strum_macros::{Display, EnumString};

pub const ENDPOINT_ATTR: &str = "data-endpoint";
pub const CATEGORY_PREFIX_ATTR: &str = "data-category-prefix";
pub const RESET_INPUT_ATTR: &str = "data-reset-input";

/// When the file input is cleared once an attempt has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ResetPolicy {
    #[default]
    Never,
    AfterSuccess,
    Always,
}

impl ResetPolicy {
    pub fn applies(self, succeeded: bool) -> bool {
        match self {
            ResetPolicy::Never => false,
            ResetPolicy::AfterSuccess => succeeded,
            ResetPolicy::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Messages {
    pub in_progress: String,
    pub missing_file: String,
    pub busy_label: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            in_progress: "Uploading and analyzing...".to_string(),
            missing_file: "Please select a file to upload.".to_string(),
            busy_label: "Analyzing...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub pending: String,
    pub success: String,
    pub error: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            pending: "#a5b4fc".to_string(),
            success: "#6ee7b7".to_string(),
            error: "#f87171".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub endpoint: String,
    pub category_prefix: Option<String>,
    pub reset_policy: ResetPolicy,
    pub messages: Messages,
    pub palette: Palette,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default().path().to_string(),
            category_prefix: None,
            reset_policy: ResetPolicy::default(),
            messages: Messages::default(),
            palette: Palette::default(),
        }
    }
}

impl ControllerConfig {
    /// Builds the config from the form's `data-*` attributes. Anything
    /// missing or unusable keeps its default.
    pub fn from_attributes<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_ATTR) {
            let endpoint = endpoint.trim();
            if endpoint.starts_with('/') {
                config.endpoint = endpoint.to_string();
            } else {
                log::warn!(
                    "Ignoring {}=\"{}\": expected an absolute path, using {}",
                    ENDPOINT_ATTR,
                    endpoint,
                    config.endpoint
                );
            }
        }

        config.category_prefix = lookup(CATEGORY_PREFIX_ATTR).filter(|prefix| !prefix.is_empty());

        if let Some(policy) = lookup(RESET_INPUT_ATTR) {
            match policy.trim().parse::<ResetPolicy>() {
                Ok(policy) => config.reset_policy = policy,
                Err(_) => log::warn!(
                    "Ignoring {}=\"{}\", using {}",
                    RESET_INPUT_ATTR,
                    policy,
                    config.reset_policy
                ),
            }
        }

        config
    }

    pub fn category_text(&self, category: &str) -> String {
        match &self.category_prefix {
            Some(prefix) => format!("{}{}", prefix, category),
            None => category.to_string(),
        }
    }
}
