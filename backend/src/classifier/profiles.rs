use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid profile document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no categories defined")]
    Empty,
    #[error("category \"{category}\" gives \"{keyword}\" a weight that is not a positive number")]
    BadWeight { category: String, keyword: String },
}

/// Keyword profiles the classifier scores documents against, in the order
/// they appear in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryProfiles {
    pub version: f32,
    pub default_category: String,
    pub categories: Vec<CategoryProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub name: String,
    pub keywords: HashMap<String, f32>,
}

impl CategoryProfiles {
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(config_str: &str) -> Result<Self, ProfileError> {
        let mut profiles: CategoryProfiles = serde_yaml::from_str(config_str)?;
        if profiles.categories.is_empty() {
            return Err(ProfileError::Empty);
        }

        for profile in &mut profiles.categories {
            let unusable = profile
                .keywords
                .iter()
                .find(|(_, weight)| !(weight.is_finite() && **weight > 0.0));
            if let Some((keyword, _)) = unusable {
                return Err(ProfileError::BadWeight {
                    category: profile.name.clone(),
                    keyword: keyword.clone(),
                });
            }
            profile.keywords = profile
                .keywords
                .drain()
                .map(|(keyword, weight)| (keyword.to_lowercase(), weight))
                .collect();
        }

        Ok(profiles)
    }
}
