//! Component registry for the Canvas domain
//!
//! The canvas renders a closed set of component kinds. Each kind carries a
//! props schema so malformed artifacts are rejected where they enter the
//! system, and a render priority so materialized pages lay out structural
//! components before atomic ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Props rejected by a component kind's schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropsError {
    #[error("props must be a JSON object")]
    NotAnObject,

    #[error("prop '{key}' must be a {expected}")]
    InvalidType { key: String, expected: &'static str },

    #[error("prop '{key}' must be one of: {allowed}")]
    UnknownVariant { key: String, allowed: String },
}

/// The closed set of component kinds the canvas can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Hero,
    CodeFrame,
    Button,
    Card,
    DataTable,
    Input,
    Badge,
    Checkbox,
    Switch,
    Separator,
    Tabs,
    Accordion,
    Label,
    Textarea,
    Skeleton,
}

impl ComponentKind {
    /// Every registered kind, in registry order
    pub const ALL: [ComponentKind; 15] = [
        ComponentKind::Hero,
        ComponentKind::CodeFrame,
        ComponentKind::Button,
        ComponentKind::Card,
        ComponentKind::DataTable,
        ComponentKind::Input,
        ComponentKind::Badge,
        ComponentKind::Checkbox,
        ComponentKind::Switch,
        ComponentKind::Separator,
        ComponentKind::Tabs,
        ComponentKind::Accordion,
        ComponentKind::Label,
        ComponentKind::Textarea,
        ComponentKind::Skeleton,
    ];

    /// The name artifacts use to reference this kind
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Hero => "Hero",
            ComponentKind::CodeFrame => "CodeFrame",
            ComponentKind::Button => "Button",
            ComponentKind::Card => "Card",
            ComponentKind::DataTable => "DataTable",
            ComponentKind::Input => "Input",
            ComponentKind::Badge => "Badge",
            ComponentKind::Checkbox => "Checkbox",
            ComponentKind::Switch => "Switch",
            ComponentKind::Separator => "Separator",
            ComponentKind::Tabs => "Tabs",
            ComponentKind::Accordion => "Accordion",
            ComponentKind::Label => "Label",
            ComponentKind::Textarea => "Textarea",
            ComponentKind::Skeleton => "Skeleton",
        }
    }

    /// Resolve a kind from its registered name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Hero" => Some(ComponentKind::Hero),
            "CodeFrame" => Some(ComponentKind::CodeFrame),
            "Button" => Some(ComponentKind::Button),
            "Card" => Some(ComponentKind::Card),
            "DataTable" => Some(ComponentKind::DataTable),
            "Input" => Some(ComponentKind::Input),
            "Badge" => Some(ComponentKind::Badge),
            "Checkbox" => Some(ComponentKind::Checkbox),
            "Switch" => Some(ComponentKind::Switch),
            "Separator" => Some(ComponentKind::Separator),
            "Tabs" => Some(ComponentKind::Tabs),
            "Accordion" => Some(ComponentKind::Accordion),
            "Label" => Some(ComponentKind::Label),
            "Textarea" => Some(ComponentKind::Textarea),
            "Skeleton" => Some(ComponentKind::Skeleton),
            _ => None,
        }
    }

    /// Human-readable description, surfaced to the assistant as tool docs
    pub fn description(&self) -> &'static str {
        match self {
            ComponentKind::Hero => {
                "The primary header section for landing pages. Includes a badge, large title, subtitle, and call-to-action buttons."
            }
            ComponentKind::CodeFrame => {
                "Renders raw HTML/CSS inside an isolated iframe. Use this for full-page previews, custom landing pages, or when standard components don't fit."
            }
            ComponentKind::Button => "Standard Shadcn button for actions and navigation.",
            ComponentKind::Card => {
                "Container for content with optional header and footer. Best for feature cards or dashboard widgets."
            }
            ComponentKind::DataTable => {
                "A structured data table with headers and rows. Good for lists and logs."
            }
            ComponentKind::Input => "Text input field.",
            ComponentKind::Badge => "Small status indicator.",
            ComponentKind::Checkbox => "Toggleable checkbox.",
            ComponentKind::Switch => "Toggle switch.",
            ComponentKind::Separator => "Horizontal or vertical divider.",
            ComponentKind::Tabs => "Tabbed interface for switching between views.",
            ComponentKind::Accordion => "Collapsible content sections.",
            ComponentKind::Label => "Semantic label for form elements.",
            ComponentKind::Textarea => "Multi-line text input.",
            ComponentKind::Skeleton => "Loading placeholder for components.",
        }
    }

    /// Layout rank for materialized pages: lower renders first
    ///
    /// Structural components come before atomic ones so a generated page
    /// reads top-down regardless of the order the assistant emitted them.
    /// Kinds sharing a rank keep their first-seen canvas order.
    pub fn render_priority(&self) -> u8 {
        match self {
            ComponentKind::Hero | ComponentKind::CodeFrame => 0,
            ComponentKind::Card
            | ComponentKind::Tabs
            | ComponentKind::Accordion
            | ComponentKind::DataTable => 1,
            ComponentKind::Separator => 2,
            ComponentKind::Label
            | ComponentKind::Input
            | ComponentKind::Textarea
            | ComponentKind::Checkbox
            | ComponentKind::Switch
            | ComponentKind::Button
            | ComponentKind::Badge
            | ComponentKind::Skeleton => 3,
        }
    }

    /// Whether this kind injects raw markup instead of composing components
    pub fn is_raw_markup(&self) -> bool {
        matches!(self, ComponentKind::CodeFrame)
    }

    /// Validate props against this kind's schema
    ///
    /// Unknown keys are ignored. Known keys with the wrong JSON type fail,
    /// naming the offending key.
    pub fn validate_props(&self, props: &Value) -> Result<(), PropsError> {
        let Some(map) = props.as_object() else {
            return Err(PropsError::NotAnObject);
        };

        match self {
            ComponentKind::Hero => {
                expect_string(map, "badge")?;
                expect_string(map, "title")?;
                expect_string(map, "subtitle")?;
                expect_string(map, "ctaText")?;
                expect_string(map, "secondaryCtaText")?;
            }
            ComponentKind::CodeFrame => {
                expect_string(map, "html")?;
            }
            ComponentKind::Button => {
                expect_string(map, "children")?;
                expect_variant(
                    map,
                    "variant",
                    &["default", "destructive", "outline", "secondary", "ghost", "link"],
                )?;
                expect_variant(map, "size", &["default", "sm", "lg", "icon"])?;
            }
            ComponentKind::Card => {
                expect_string(map, "title")?;
                expect_string(map, "description")?;
                expect_string(map, "content")?;
                expect_string(map, "footer")?;
            }
            ComponentKind::DataTable => {
                expect_string(map, "title")?;
                expect_entries(map, "columns", &["key", "label"], &[])?;
                expect_array(map, "data")?;
            }
            ComponentKind::Input => {
                expect_string(map, "placeholder")?;
                expect_string(map, "type")?;
            }
            ComponentKind::Badge => {
                expect_string(map, "children")?;
                expect_variant(
                    map,
                    "variant",
                    &["default", "secondary", "destructive", "outline"],
                )?;
            }
            ComponentKind::Checkbox => {
                expect_bool(map, "checked")?;
                expect_string(map, "label")?;
            }
            ComponentKind::Switch => {
                expect_bool(map, "checked")?;
            }
            ComponentKind::Separator => {
                expect_variant(map, "orientation", &["horizontal", "vertical"])?;
            }
            ComponentKind::Tabs => {
                expect_string(map, "defaultValue")?;
                expect_entries(map, "items", &[], &["label", "value", "content"])?;
            }
            ComponentKind::Accordion => {
                expect_variant(map, "type", &["single", "multiple"])?;
                expect_entries(map, "items", &[], &["trigger", "content"])?;
            }
            ComponentKind::Label => {
                expect_string(map, "children")?;
            }
            ComponentKind::Textarea => {
                expect_string(map, "placeholder")?;
            }
            ComponentKind::Skeleton => {}
        }

        // Every kind accepts a styling escape hatch
        expect_string(map, "className")
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn expect_string(map: &Map<String, Value>, key: &str) -> Result<(), PropsError> {
    match map.get(key) {
        Some(value) if !value.is_string() => Err(PropsError::InvalidType {
            key: key.to_string(),
            expected: "string",
        }),
        _ => Ok(()),
    }
}

fn expect_bool(map: &Map<String, Value>, key: &str) -> Result<(), PropsError> {
    match map.get(key) {
        Some(value) if !value.is_boolean() => Err(PropsError::InvalidType {
            key: key.to_string(),
            expected: "boolean",
        }),
        _ => Ok(()),
    }
}

fn expect_array(map: &Map<String, Value>, key: &str) -> Result<(), PropsError> {
    match map.get(key) {
        Some(value) if !value.is_array() => Err(PropsError::InvalidType {
            key: key.to_string(),
            expected: "array",
        }),
        _ => Ok(()),
    }
}

fn expect_variant(
    map: &Map<String, Value>,
    key: &str,
    allowed: &[&str],
) -> Result<(), PropsError> {
    let Some(value) = map.get(key) else {
        return Ok(());
    };
    match value {
        Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
        Value::String(_) => Err(PropsError::UnknownVariant {
            key: key.to_string(),
            allowed: allowed.join(", "),
        }),
        _ => Err(PropsError::InvalidType {
            key: key.to_string(),
            expected: "string",
        }),
    }
}

/// Validate an array of objects under `key`: `required` fields must be
/// strings, `optional` fields must be strings when present
fn expect_entries(
    map: &Map<String, Value>,
    key: &str,
    required: &[&str],
    optional: &[&str],
) -> Result<(), PropsError> {
    let Some(value) = map.get(key) else {
        return Ok(());
    };
    let Some(entries) = value.as_array() else {
        return Err(PropsError::InvalidType {
            key: key.to_string(),
            expected: "array",
        });
    };
    for (index, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            return Err(PropsError::InvalidType {
                key: format!("{key}[{index}]"),
                expected: "object",
            });
        };
        for field in required {
            if !matches!(fields.get(*field), Some(Value::String(_))) {
                return Err(PropsError::InvalidType {
                    key: format!("{key}[{index}].{field}"),
                    expected: "string",
                });
            }
        }
        for field in optional {
            if let Some(value) = fields.get(*field) {
                if !value.is_string() {
                    return Err(PropsError::InvalidType {
                        key: format!("{key}[{index}].{field}"),
                        expected: "string",
                    });
                }
            }
        }
    }
    Ok(())
}
