//! Generation configuration.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Configuration for one generation run.
///
/// Serialized in camelCase. The original exporter spellings
/// (`treeshaking`, `codesplitting`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Target UI framework.
    pub framework: Framework,
    /// Emit TypeScript instead of JavaScript.
    pub typescript: bool,
    /// Styling approach.
    pub styling: Styling,
    /// Enabled optimizations.
    pub optimization: OptimizationConfig,
    /// Accessibility feature toggles.
    pub accessibility: AccessibilityConfig,
    /// Test generation toggles.
    pub testing: TestingConfig,
    /// Emit a README next to the component.
    pub documentation: bool,
    /// Name of the generated component.
    pub component_name: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            framework: Framework::React,
            typescript: true,
            styling: Styling::Css,
            optimization: OptimizationConfig::default(),
            accessibility: AccessibilityConfig::default(),
            testing: TestingConfig::default(),
            documentation: false,
            component_name: "GeneratedComponent".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Parse a configuration from JSON text and validate it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let name = &self.component_name;
        let mut chars = name.chars();
        let starts_ok = chars
            .next()
            .map(|c| c.is_ascii_uppercase())
            .unwrap_or(false);
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(CoreError::InvalidConfig(format!(
                "component name '{}' must be a PascalCase identifier",
                name
            )));
        }
        Ok(())
    }

    /// Source extension for script files.
    pub fn script_extension(&self) -> &'static str {
        if self.typescript {
            "ts"
        } else {
            "js"
        }
    }

    /// Language tag for script files.
    pub fn script_language(&self) -> &'static str {
        if self.typescript {
            "typescript"
        } else {
            "javascript"
        }
    }
}

/// Target UI framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    React,
    Vue,
    Angular,
    Svelte,
}

impl Framework {
    /// Framework name as used in package manifests.
    pub fn name(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
        }
    }

    /// Extension of the main component file.
    pub fn component_extension(&self, typescript: bool) -> &'static str {
        match (self, typescript) {
            (Self::React, true) => "tsx",
            (Self::React, false) => "jsx",
            (Self::Vue, _) => "vue",
            (Self::Angular, true) => "ts",
            (Self::Angular, false) => "js",
            (Self::Svelte, _) => "svelte",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Framework {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "react" => Ok(Self::React),
            "vue" => Ok(Self::Vue),
            "angular" => Ok(Self::Angular),
            "svelte" => Ok(Self::Svelte),
            other => Err(CoreError::InvalidConfig(format!("unknown framework: {}", other))),
        }
    }
}

/// Styling approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Styling {
    #[default]
    Css,
    #[serde(alias = "sass")]
    Scss,
    #[serde(alias = "utility")]
    Tailwind,
}

impl Styling {
    /// Stylesheet file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Scss => "scss",
            Self::Css | Self::Tailwind => "css",
        }
    }

    /// Stylesheet language tag.
    pub fn language(&self) -> &'static str {
        match self {
            Self::Scss => "scss",
            Self::Css | Self::Tailwind => "css",
        }
    }
}

/// Optimization toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationConfig {
    #[serde(alias = "treeshaking")]
    pub tree_shaking: bool,
    #[serde(alias = "codesplitting")]
    pub code_splitting: bool,
    pub lazy_loading: bool,
    pub bundle_analysis: bool,
}

/// Accessibility toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilityConfig {
    pub screen_reader: bool,
    pub keyboard_navigation: bool,
    pub color_contrast: bool,
    pub wcag_level: WcagLevel,
}

/// Target WCAG conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    #[default]
    AA,
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::AA => write!(f, "AA"),
            Self::AAA => write!(f, "AAA"),
        }
    }
}

/// Test generation toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestingConfig {
    pub unit_tests: bool,
    pub integration_tests: bool,
    pub e2e_tests: bool,
}
