//! Scripted probe client

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use testbed_core::probe::{ProbeClient, ProbeError, ProbeResponse, Result};
use url::Url;

/// Canned outcome for one candidate URL.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Respond with this HTTP status
    Status(u16),

    /// Simulate "no server listening here"
    Refused,

    /// Simulate a transport failure other than refusal
    Transport(String),
}

/// [`ProbeClient`] answering from a script instead of the network.
///
/// URLs without a scripted outcome answer "connection refused". Clones
/// share state; keep one in the test to inspect the probes issued.
#[derive(Clone, Default)]
pub struct ScriptedProbe {
    inner: Arc<ProbeState>,
}

#[derive(Default)]
struct ProbeState {
    outcomes: Mutex<HashMap<String, ScriptedOutcome>>,
    issued: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for one URL. Builder-style.
    pub fn on(self, url: &str, outcome: ScriptedOutcome) -> Self {
        self.inner
            .outcomes
            .lock()
            .expect("probe state poisoned")
            .insert(url.to_string(), outcome);
        self
    }

    /// Every URL probed so far, in order.
    pub fn issued(&self) -> Vec<String> {
        self.inner
            .issued
            .lock()
            .expect("probe state poisoned")
            .clone()
    }
}

impl ProbeClient for ScriptedProbe {
    fn probe(&self, url: &Url) -> Result<ProbeResponse> {
        self.inner
            .issued
            .lock()
            .expect("probe state poisoned")
            .push(url.to_string());

        let outcomes = self.inner.outcomes.lock().expect("probe state poisoned");
        match outcomes.get(url.as_str()) {
            Some(ScriptedOutcome::Status(status)) => Ok(ProbeResponse {
                status: *status,
                content_type: Some("text/html; charset=UTF-8".to_string()),
            }),
            Some(ScriptedOutcome::Transport(message)) => {
                Err(ProbeError::Transport(message.clone()))
            }
            Some(ScriptedOutcome::Refused) | None => Err(ProbeError::Refused),
        }
    }
}
