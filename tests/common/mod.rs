use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rxverify::{ApiErrorKind, Oracle, OracleRequest, Result, RxVerifyError};

/// An oracle that replays scripted replies and records what it was sent.
#[derive(Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<OracleRequest>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(text: &str) -> Self {
        Self::new().then_reply(text)
    }

    pub fn then_reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn then_fail(self, error: RxVerifyError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> OracleRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(RxVerifyError::api_error(
                "scripted",
                ApiErrorKind::UnexpectedResponse {
                    details: "no scripted reply left".to_string(),
                },
            ))
        })
    }
}

#[allow(dead_code)]
pub const WARFARIN_ANALYSIS: &str = r#"{
  "drugs": [
    {"name": "Warfarin", "description": "Anticoagulant.", "classes": ["anticoagulant"], "dosage": "5 mg", "frequency": "once daily"},
    {"name": "Ibuprofen", "description": "NSAID pain reliever.", "classes": ["NSAID"], "dosage": "400 mg", "frequency": "three times daily"}
  ],
  "interactions": [
    {"pair": ["Warfarin", "Ibuprofen"], "severity": "high", "explanation": "NSAIDs increase bleeding risk with anticoagulants."}
  ],
  "dosageRecommendations": [
    {"drug": "Ibuprofen", "recommendation": "Avoid; prefer paracetamol.", "warning": "Bleeding risk in elderly patients."}
  ],
  "alternativeSuggestions": [
    {"forDrug": "Ibuprofen", "reason": "Interaction with Warfarin.", "suggestion": "Consider replacing with Paracetamol 500 mg.", "suggestedDrug": "Paracetamol"}
  ]
}"#;
