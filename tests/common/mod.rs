//! Shared test utilities: mock pipeline collaborators

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use voxchat::session::ChatMessage;
use voxchat::voice::AudioClip;
use voxchat::{ChatModel, Error, Respond, Result, Synthesize, Transcribe};

/// Build a clip with the given id and duration
#[must_use]
pub fn clip(id: u64, secs: f64) -> AudioClip {
    AudioClip {
        id,
        wav: vec![0u8; 64],
        duration: Duration::from_secs_f64(secs),
    }
}

/// Transcriber returning a fixed text, or failing when `text` is `None`
pub struct MockTranscriber {
    pub text: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockTranscriber {
    pub fn ok(text: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                text: Some(text.to_string()),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Transcribe for MockTranscriber {
    async fn transcribe(&self, _wav: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .ok_or_else(|| Error::Stt("mock transcription failure".to_string()))
    }
}

/// Responder returning a fixed reply and recording what it was asked
pub struct MockResponder {
    pub reply: Option<String>,
    /// (selected model, history length) per call
    pub requests: Arc<Mutex<Vec<(ChatModel, usize)>>>,
}

impl MockResponder {
    pub fn ok(reply: &str) -> (Self, Arc<Mutex<Vec<(ChatModel, usize)>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reply: Some(reply.to_string()),
                requests: Arc::clone(&requests),
            },
            requests,
        )
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Respond for MockResponder {
    async fn respond(&self, history: &[ChatMessage], model: ChatModel) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((model, history.len()));
        self.reply
            .clone()
            .ok_or_else(|| Error::Chat("mock chat failure".to_string()))
    }
}

/// Synthesizer returning fixed MP3 bytes, or failing
pub struct MockSynthesizer {
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    pub fn ok() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                fail: false,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Synthesize for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(Error::Tts("mock synthesis failure".to_string()))
        } else {
            Ok(b"mock-mp3".to_vec())
        }
    }
}
