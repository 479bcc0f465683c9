//! Artifact reduction: fold a message history into the renderable canvas
//!
//! The canvas holds at most one artifact per component kind. A later artifact
//! of a kind replaces the earlier one in place, so every kind keeps the
//! position it first appeared at while always showing its latest props.

use canvasforge_assistant::ThreadMessage;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::domain::registry::{ComponentKind, PropsError};

/// A renderable component emitted by the assistant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub message_id: String,
    pub kind: ComponentKind,
    pub props: Value,
    pub rendered_html: String,
}

impl Artifact {
    /// Build an artifact, validating props against the kind's schema
    pub fn new(
        message_id: String,
        kind: ComponentKind,
        props: Value,
        rendered_html: String,
    ) -> Result<Self, PropsError> {
        kind.validate_props(&props)?;
        Ok(Artifact {
            message_id,
            kind,
            props,
            rendered_html,
        })
    }
}

/// Latest artifact per kind, ordered by first appearance
pub type CanvasSet = IndexMap<ComponentKind, Artifact>;

/// Fold a message history into the canvas
///
/// Only messages carrying both a component invocation and rendered markup
/// contribute. Artifacts naming an unregistered kind or failing the kind's
/// props schema are dropped with a warning; the rest of the history still
/// reduces.
pub fn reduce(messages: &[ThreadMessage]) -> CanvasSet {
    let mut canvas = CanvasSet::new();
    for message in messages {
        let Some(invocation) = &message.component else {
            continue;
        };
        let Some(html) = &message.rendered_html else {
            continue;
        };
        let Some(kind) = ComponentKind::from_name(&invocation.name) else {
            tracing::warn!(
                message_id = %message.id,
                kind = %invocation.name,
                "Skipping artifact with unregistered component kind"
            );
            continue;
        };
        match Artifact::new(
            message.id.clone(),
            kind,
            invocation.props.clone(),
            html.clone(),
        ) {
            Ok(artifact) => {
                // IndexMap keeps the original slot on overwrite, which is
                // exactly the first-seen ordering the canvas wants
                canvas.insert(kind, artifact);
            }
            Err(error) => {
                tracing::warn!(
                    message_id = %message.id,
                    kind = %kind,
                    %error,
                    "Skipping artifact with invalid props"
                );
            }
        }
    }
    canvas
}

/// Conversation turns suitable for a text transcript
///
/// Artifact-only turns carry no visible text and are filtered out.
pub fn transcript(messages: &[ThreadMessage]) -> Vec<&ThreadMessage> {
    messages
        .iter()
        .filter(|message| !message.is_blank())
        .collect()
}
