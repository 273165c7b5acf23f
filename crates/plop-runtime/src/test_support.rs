//! Scripted transport fake shared by dispatcher and reminder tests.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use plop_line::{MessagingTransport, ReplyPayload};

pub struct ScriptedTransport {
    display_name: Mutex<String>,
    fail_profile: Mutex<bool>,
    fail_push_to: Mutex<HashSet<String>>,
    replies: Mutex<Vec<(String, ReplyPayload)>>,
    pushes: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            display_name: Mutex::new("Alice".to_string()),
            fail_profile: Mutex::new(false),
            fail_push_to: Mutex::new(HashSet::new()),
            replies: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_display_name(&self, name: &str) {
        *self.display_name.lock().unwrap() = name.to_string();
    }

    pub fn fail_profile_lookups(&self) {
        *self.fail_profile.lock().unwrap() = true;
    }

    pub fn fail_push_to(&self, context_id: &str) {
        self.fail_push_to
            .lock()
            .unwrap()
            .insert(context_id.to_string());
    }

    pub fn replies(&self) -> Vec<(String, ReplyPayload)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingTransport for ScriptedTransport {
    async fn reply(&self, reply_token: &str, payload: &ReplyPayload) -> Result<()> {
        self.replies
            .lock()
            .unwrap()
            .push((reply_token.to_string(), payload.clone()));
        Ok(())
    }

    async fn push(&self, to: &str, text: &str) -> Result<()> {
        if self.fail_push_to.lock().unwrap().contains(to) {
            return Err(anyhow!("push to {to} rejected"));
        }
        self.pushes
            .lock()
            .unwrap()
            .push((to.to_string(), text.to_string()));
        Ok(())
    }

    async fn get_display_name(&self, _user_id: &str) -> Result<String> {
        if *self.fail_profile.lock().unwrap() {
            return Err(anyhow!("profile lookup unavailable"));
        }
        Ok(self.display_name.lock().unwrap().clone())
    }
}
