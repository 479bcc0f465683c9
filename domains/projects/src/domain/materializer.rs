//! Canvas materialization: textual codegen into a virtual file tree
//!
//! Turns the reduced canvas into the source files of a standalone Vite
//! React project. Generation is purely textual: each artifact's props are
//! splatted into JSX attribute source, one component file per artifact,
//! plus a fixed scaffold. No AST library is involved, so the emitters are
//! deliberately conservative and refuse anything they cannot render as
//! valid source.

use canvasforge_canvas::{Artifact, CanvasSet};
use indexmap::IndexMap;
use serde_json::Value;

/// Virtual project tree: absolute path → file contents, insertion-ordered
pub type FileTree = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaterializeError {
    #[error("Cannot generate source for {component}: prop '{key}' does not render as JSX")]
    Serialization { component: String, key: String },
}

/// Codegen failures are user-visible 422s naming the offending artifact
impl From<MaterializeError> for canvasforge_common::Error {
    fn from(error: MaterializeError) -> Self {
        canvasforge_common::Error::Codegen(error.to_string())
    }
}

/// Placeholder shim the generated component imports resolve against
const WRAPPERS_SHIM: &str = "// Shadcn Wrapper components...";

const TAILWIND_CONFIG: &str = "// Tailwind config...";

const PACKAGE_JSON: &str = r#"{
  "dependencies": {
    "react": "^18.0.0",
    "react-dom": "^18.0.0",
    "lucide-react": "latest",
    "tailwindcss": "latest"
  }
}"#;

/// Materialize the canvas into a complete project tree.
///
/// A CodeFrame artifact takes the canvas over: its raw markup already is a
/// full page, so every other artifact is dropped and the app renders the
/// frame alone at full viewport. Otherwise artifacts are laid out in
/// `render_priority` order, ties keeping their canvas order.
pub fn materialize(canvas: &CanvasSet) -> Result<FileTree, MaterializeError> {
    let mut artifacts: Vec<&Artifact> = canvas.values().collect();
    let takeover = artifacts.iter().any(|a| a.kind.is_raw_markup());
    if takeover {
        artifacts.retain(|a| a.kind.is_raw_markup());
    } else {
        // Stable sort: equal priorities keep first-seen canvas order
        artifacts.sort_by_key(|a| a.kind.render_priority());
    }

    let mut files = FileTree::new();
    files.insert("/src/App.tsx".to_string(), app_source(&artifacts, takeover));
    files.insert(
        "/src/components/ui/wrappers.tsx".to_string(),
        WRAPPERS_SHIM.to_string(),
    );
    files.insert("/package.json".to_string(), PACKAGE_JSON.to_string());
    files.insert("/tailwind.config.js".to_string(), TAILWIND_CONFIG.to_string());

    for artifact in &artifacts {
        files.insert(
            format!("/src/components/{}.tsx", artifact.kind.name()),
            component_source(artifact)?,
        );
    }

    Ok(files)
}

/// Generate `/src/App.tsx`: one import and one instance per artifact
fn app_source(artifacts: &[&Artifact], takeover: bool) -> String {
    let imports = artifacts
        .iter()
        .map(|a| format!("import {0} from \"./components/{0}\";", a.kind.name()))
        .collect::<Vec<_>>()
        .join("\n");
    let instances = artifacts
        .iter()
        .map(|a| format!("      <{} />", a.kind.name()))
        .collect::<Vec<_>>()
        .join("\n");
    let class_name = if takeover {
        "w-full h-screen"
    } else {
        "min-h-screen bg-zinc-950 text-white p-8 space-y-12 flex flex-col items-center"
    };

    format!(
        "import React from \"react\";\n{}\n\nexport default function App() {{\n  return (\n    <div className=\"{}\">\n{}\n    </div>\n  );\n}}",
        imports, class_name, instances
    )
}

/// Generate one `/src/components/{Name}.tsx` file
fn component_source(artifact: &Artifact) -> Result<String, MaterializeError> {
    let name = artifact.kind.name();

    if artifact.kind.is_raw_markup() {
        // Raw markup lands in a template literal, so backticks and `${`
        // must not terminate it
        let html = artifact
            .props
            .get("html")
            .and_then(Value::as_str)
            .unwrap_or("")
            .replace('`', "\\`")
            .replace("${", "\\${");
        return Ok(format!(
            "import React from \"react\";\n\nexport const CodeFrame = () => {{\n  return (\n    <div className=\"w-full h-screen bg-white\" dangerouslySetInnerHTML={{{{ __html: `{}` }}}} />\n  );\n}};\n\nexport default CodeFrame;",
            html
        ));
    }

    let props = artifact
        .props
        .as_object()
        .ok_or_else(|| MaterializeError::Serialization {
            component: name.to_string(),
            key: "props".to_string(),
        })?;

    let mut attributes = Vec::with_capacity(props.len());
    for (key, value) in props {
        attributes.push(render_attribute(name, key, value)?);
    }

    let tag = if attributes.is_empty() {
        format!("<Shadcn{} />", name)
    } else {
        format!("<Shadcn{} {} />", name, attributes.join(" "))
    };

    Ok(format!(
        "import React from \"react\";\nimport {{ {0} as Shadcn{0} }} from \"@/components/ui/wrappers\";\n\nexport const {0} = () => {{\n  return (\n    {1}\n  );\n}};\n\nexport default {0};",
        name, tag
    ))
}

/// Render one prop as JSX attribute source.
///
/// Strings become quoted attributes, booleans and numbers are inlined in
/// braces, and objects, arrays, and null are embedded as pretty-printed
/// JSON expressions.
fn render_attribute(component: &str, key: &str, value: &Value) -> Result<String, MaterializeError> {
    if !is_js_identifier(key) {
        return Err(MaterializeError::Serialization {
            component: component.to_string(),
            key: key.to_string(),
        });
    }

    let rendered = match value {
        Value::String(text) => format!("{}=\"{}\"", key, escape_attribute(text)),
        Value::Bool(_) | Value::Number(_) => format!("{}={{{}}}", key, value),
        other => {
            let json =
                serde_json::to_string_pretty(other).map_err(|_| MaterializeError::Serialization {
                    component: component.to_string(),
                    key: key.to_string(),
                })?;
            format!("{}={{{}}}", key, json)
        }
    };
    Ok(rendered)
}

/// Double quotes would terminate the attribute; the entity form survives
/// both JSX parsing and the eventual DOM text
fn escape_attribute(text: &str) -> String {
    text.replace('"', "&quot;")
}

fn is_js_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
