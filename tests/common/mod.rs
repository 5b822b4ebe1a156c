#![allow(dead_code)]
//! Shared fakes for exercising the pipeline and API without real providers

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use canvasspark_studio::error::{AppError, Result};
use canvasspark_studio::provider::{
    ClassificationScore, ImageGenerator, TextClassifier, TextGenerator,
};

pub fn score(label: &str, value: f64) -> ClassificationScore {
    ClassificationScore {
        label: label.to_string(),
        score: Some(value),
    }
}

pub fn unscored(label: &str) -> ClassificationScore {
    ClassificationScore {
        label: label.to_string(),
        score: None,
    }
}

/// PNG magic bytes followed by filler, enough to pass format detection
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"fake image payload");
    data
}

/// Classifier returning a fixed score list, counting calls
pub struct FakeClassifier {
    pub scores: Vec<ClassificationScore>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeClassifier {
    pub fn new(scores: Vec<ClassificationScore>) -> Self {
        Self {
            scores,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl TextClassifier for FakeClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ClassificationScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.scores.clone())
    }
}

/// Classifier that always fails, standing in for a provider outage
pub struct FailingClassifier;

#[async_trait]
impl TextClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ClassificationScore>> {
        Err(AppError::Provider("classification backend down".to_string()))
    }
}

/// Image generator returning fixed bytes, recording the composed prompt
pub struct FakeImageGenerator {
    pub bytes: Vec<u8>,
    pub calls: Arc<AtomicUsize>,
    pub last_prompt: Arc<Mutex<Option<String>>>,
}

impl FakeImageGenerator {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());
        Ok(self.bytes.clone())
    }
}

/// Text generator returning a fixed response, counting calls
pub struct FakeTextGenerator {
    pub response: String,
    pub calls: Arc<AtomicUsize>,
}

impl FakeTextGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate_text(&self, _system: &str, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}
