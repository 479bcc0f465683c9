//! Mock Conversation Store Implementation
//!
//! Programmable in-memory store for testing conversation workflows:
//! - `MockAssistantService`: thread store with deterministic ids
//! - `MockAssistantBehavior`: scripts the next assistant reply, the
//!   generated thread name, and per-operation failures

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use indexmap::IndexMap;

use crate::{
    AssistantError, AssistantService, ComponentInvocation, ContentPart, MessageRole, Thread,
    ThreadMessage, ThreadSummary,
};

/// Build a plain text message for tests and mock replies
pub fn text_message(id: &str, role: MessageRole, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role,
        content: vec![ContentPart {
            part_type: "text".to_string(),
            text: text.to_string(),
        }],
        component: None,
        rendered_html: None,
        created_at: Utc::now(),
    }
}

/// Build an artifact-only assistant message (no visible text)
pub fn artifact_message(id: &str, kind: &str, props: serde_json::Value, html: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role: MessageRole::Assistant,
        content: vec![],
        component: Some(ComponentInvocation {
            name: kind.to_string(),
            props,
        }),
        rendered_html: Some(html.to_string()),
        created_at: Utc::now(),
    }
}

/// The assistant turn the mock appends after each submitted message
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    pub text: String,
    pub component: Option<ComponentInvocation>,
    pub rendered_html: Option<String>,
}

/// Programmable behavior for the mock conversation store
#[derive(Debug)]
pub struct MockAssistantBehavior {
    pub reply: Arc<RwLock<Option<ScriptedReply>>>,
    pub generated_name: Arc<RwLock<String>>,
    pub fail_submit: Arc<RwLock<bool>>,
    pub failing_deletes: Arc<RwLock<HashSet<String>>>,
}

impl Default for MockAssistantBehavior {
    fn default() -> Self {
        Self {
            reply: Arc::new(RwLock::new(None)),
            generated_name: Arc::new(RwLock::new("Generated Project".to_string())),
            fail_submit: Arc::new(RwLock::new(false)),
            failing_deletes: Arc::new(RwLock::new(HashSet::new())),
        }
    }
}

impl MockAssistantBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the assistant turn appended after the next submits
    pub fn script_reply(&self, reply: ScriptedReply) {
        *self.reply.write().unwrap() = Some(reply);
    }

    /// Configure the name returned by generate_thread_name
    pub fn set_generated_name(&self, name: &str) {
        *self.generated_name.write().unwrap() = name.to_string();
    }

    /// Make submit_message fail until reset
    pub fn set_fail_submit(&self, fail: bool) {
        *self.fail_submit.write().unwrap() = fail;
    }

    /// Make delete_thread fail for a specific thread id
    pub fn fail_delete_of(&self, thread_id: &str) {
        self.failing_deletes
            .write()
            .unwrap()
            .insert(thread_id.to_string());
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        *self.reply.write().unwrap() = None;
        *self.generated_name.write().unwrap() = "Generated Project".to_string();
        *self.fail_submit.write().unwrap() = false;
        self.failing_deletes.write().unwrap().clear();
    }
}

/// Mock conversation store with programmable behavior
#[derive(Debug, Clone)]
pub struct MockAssistantService {
    behavior: Arc<MockAssistantBehavior>,
    threads: Arc<RwLock<IndexMap<String, Thread>>>,
    next_id: Arc<AtomicU64>,
}

impl MockAssistantService {
    pub fn new() -> Self {
        Self {
            behavior: Arc::new(MockAssistantBehavior::new()),
            threads: Arc::new(RwLock::new(IndexMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Handle for programming behavior from tests
    pub fn behavior(&self) -> Arc<MockAssistantBehavior> {
        self.behavior.clone()
    }

    /// Preload a thread with a fixed message log; returns its id
    pub fn seed_thread(&self, name: Option<&str>, messages: Vec<ThreadMessage>) -> String {
        let id = format!("thread_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let thread = Thread {
            id: id.clone(),
            name: name.map(|n| n.to_string()),
            messages,
        };
        self.threads.write().unwrap().insert(id.clone(), thread);
        id
    }

    fn next_message_id(&self) -> String {
        format!("msg_{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MockAssistantService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AssistantService for MockAssistantService {
    async fn list_threads(&self) -> Result<Vec<ThreadSummary>, AssistantError> {
        let threads = self.threads.read().unwrap();
        Ok(threads
            .values()
            .map(|t| ThreadSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                message_count: t.messages.len() as i64,
                updated_at: t
                    .messages
                    .last()
                    .map(|m| m.created_at)
                    .unwrap_or_else(Utc::now),
            })
            .collect())
    }

    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        let id = format!("thread_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let thread = Thread {
            id: id.clone(),
            name: None,
            messages: Vec::new(),
        };
        self.threads
            .write()
            .unwrap()
            .insert(id, thread.clone());
        Ok(thread)
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<Thread, AssistantError> {
        self.threads
            .read()
            .unwrap()
            .get(thread_id)
            .cloned()
            .ok_or_else(|| AssistantError::NotFound(thread_id.to_string()))
    }

    async fn submit_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<Thread, AssistantError> {
        if *self.behavior.fail_submit.read().unwrap() {
            return Err(AssistantError::Request("Scripted submit failure".to_string()));
        }

        let reply = self.behavior.reply.read().unwrap().clone();

        let mut threads = self.threads.write().unwrap();
        let thread = threads
            .get_mut(thread_id)
            .ok_or_else(|| AssistantError::NotFound(thread_id.to_string()))?;

        let user_id = self.next_message_id();
        thread
            .messages
            .push(text_message(&user_id, MessageRole::User, text));

        let assistant_id = self.next_message_id();
        let assistant_turn = match reply {
            Some(scripted) => ThreadMessage {
                id: assistant_id,
                role: MessageRole::Assistant,
                content: vec![ContentPart {
                    part_type: "text".to_string(),
                    text: scripted.text,
                }],
                component: scripted.component,
                rendered_html: scripted.rendered_html,
                created_at: Utc::now(),
            },
            None => text_message(
                &assistant_id,
                MessageRole::Assistant,
                &format!("Mock reply to: {}", text),
            ),
        };
        thread.messages.push(assistant_turn);

        Ok(thread.clone())
    }

    async fn generate_thread_name(&self, thread_id: &str) -> Result<String, AssistantError> {
        let name = self.behavior.generated_name.read().unwrap().clone();

        let mut threads = self.threads.write().unwrap();
        let thread = threads
            .get_mut(thread_id)
            .ok_or_else(|| AssistantError::NotFound(thread_id.to_string()))?;
        thread.name = Some(name.clone());

        Ok(name)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), AssistantError> {
        if self
            .behavior
            .failing_deletes
            .read()
            .unwrap()
            .contains(thread_id)
        {
            return Err(AssistantError::Request(format!(
                "Scripted delete failure for {}",
                thread_id
            )));
        }

        self.threads
            .write()
            .unwrap()
            .shift_remove(thread_id)
            .map(|_| ())
            .ok_or_else(|| AssistantError::NotFound(thread_id.to_string()))
    }
}
