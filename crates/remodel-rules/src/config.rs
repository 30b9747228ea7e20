//! Rule configuration
//!
//! Loaded from the `[rules]` table of `remodel.toml`; every field has a
//! default so an empty table is valid.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Props every known UI library component is annotated with
const DEFAULT_PROP_TABLE: &[(&str, &[&str])] = &[
    ("Button", &["onClick", "children", "variant", "color", "disabled"]),
    ("Typography", &["variant", "color", "children", "component"]),
    ("Paper", &["elevation", "children", "style", "className"]),
    ("Grid", &["container", "item", "spacing", "direction", "children"]),
    ("TextField", &["label", "value", "onChange", "variant", "margin"]),
    ("AppBar", &["position", "color", "children"]),
    ("Toolbar", &["children"]),
    ("IconButton", &["onClick", "children", "color", "size"]),
];

/// Props assumed for components missing from the table
const FALLBACK_PROPS: &[&str] = &["children"];

/// Built-in component → props table
#[must_use]
pub fn default_prop_table() -> IndexMap<String, Vec<String>> {
    DEFAULT_PROP_TABLE
        .iter()
        .map(|(component, props)| {
            (
                (*component).to_string(),
                props.iter().map(|p| (*p).to_string()).collect(),
            )
        })
        .collect()
}

/// Entries from configuration override the built-in table per component
fn merge_prop_table<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = IndexMap::<String, Vec<String>>::deserialize(deserializer)?;
    let mut table = default_prop_table();
    table.extend(overrides);
    Ok(table)
}

/// Settings shared by all rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Module path of the UI framework
    pub react_module: String,
    /// Identifier the framework is referenced through (`React.Component`)
    pub react_namespace: String,
    /// Module path of the component library
    pub ui_library_module: String,
    /// Module path of the prop-types package
    pub prop_types_module: String,
    /// Preferred local name for the prop-types default import
    pub prop_types_namespace: String,
    /// Keep `useState` arguments as initial state when converting function
    /// components (otherwise state starts as `null`)
    pub preserve_initial_state: bool,
    /// Component → expected prop names
    #[serde(deserialize_with = "merge_prop_table")]
    pub prop_table: IndexMap<String, Vec<String>>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            react_module: "react".to_string(),
            react_namespace: "React".to_string(),
            ui_library_module: "@material-ui/core".to_string(),
            prop_types_module: "prop-types".to_string(),
            prop_types_namespace: "PropTypes".to_string(),
            preserve_initial_state: false,
            prop_table: default_prop_table(),
        }
    }
}

impl RuleConfig {
    /// Expected props for a library component
    #[must_use]
    pub fn props_for(&self, component: &str) -> Vec<&str> {
        self.prop_table.get(component).map_or_else(
            || FALLBACK_PROPS.to_vec(),
            |props| props.iter().map(String::as_str).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_known_components() {
        let config = RuleConfig::default();
        assert_eq!(config.prop_table.len(), 8);
        assert_eq!(
            config.props_for("Button"),
            vec!["onClick", "children", "variant", "color", "disabled"]
        );
        assert_eq!(config.props_for("Divider"), vec!["children"]);
    }

    #[test]
    fn empty_table_uses_defaults() {
        let config: RuleConfig = toml::from_str("").expect("config");
        assert_eq!(config, RuleConfig::default());
    }

    #[test]
    fn prop_table_overrides_merge_with_defaults() {
        let config: RuleConfig = toml::from_str(
            "preserve_initial_state = true\n[prop_table]\nButton = [\"onClick\"]\nChip = [\"label\", \"onDelete\"]\n",
        )
        .expect("config");
        assert!(config.preserve_initial_state);
        assert_eq!(config.props_for("Button"), vec!["onClick"]);
        assert_eq!(config.props_for("Chip"), vec!["label", "onDelete"]);
        assert_eq!(config.props_for("Toolbar"), vec!["children"]);
        assert_eq!(config.react_module, "react");
    }
}
