//! Scripted oracle for tests: returns canned replies in order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use barista_core::types::DialogueTurn;

use crate::client::Oracle;
use crate::error::OracleError;

/// Test oracle that plays back a fixed sequence of raw replies. Errors with
/// [`OracleError::Exhausted`] once the script runs out.
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedOracle {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    /// Append another reply to the script.
    pub fn push(&self, reply: impl Into<String>) {
        self.replies
            .lock()
            .expect("scripted oracle lock poisoned")
            .push_back(reply.into());
    }

    pub fn remaining(&self) -> usize {
        self.replies
            .lock()
            .expect("scripted oracle lock poisoned")
            .len()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(
        &self,
        _system: &str,
        _history: &[DialogueTurn],
    ) -> Result<String, OracleError> {
        self.replies
            .lock()
            .expect("scripted oracle lock poisoned")
            .pop_front()
            .ok_or(OracleError::Exhausted)
    }
}
