//! Unit tests for the generation pipeline, moderation gate, and enhancer

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use canvasspark_studio::error::AppError;
use canvasspark_studio::pipeline::generation::{compose_prompt, DEFAULT_STYLE};
use canvasspark_studio::pipeline::{
    GenerateParams, GenerationPipeline, ModerationGate, PromptEnhancer, Verdict,
};

use common::{
    png_bytes, score, unscored, FailingClassifier, FakeClassifier, FakeImageGenerator,
    FakeTextGenerator,
};

fn params(prompt: &str, negative: Option<&str>, style: Option<&str>) -> GenerateParams {
    GenerateParams {
        prompt: prompt.to_string(),
        negative_prompt: negative.map(String::from),
        style: style.map(String::from),
    }
}

fn pipeline(
    classifier: FakeClassifier,
    generator: FakeImageGenerator,
) -> GenerationPipeline {
    GenerationPipeline::new(ModerationGate::new(Arc::new(classifier)), Arc::new(generator))
}

// --- Prompt composition ---

#[test]
fn test_compose_uses_default_style() {
    let composed = compose_prompt(&params("a red fox in snow", None, None));
    assert_eq!(composed, "whimsical, illustrative style, a red fox in snow");
}

#[test]
fn test_compose_uses_custom_style() {
    let composed = compose_prompt(&params("a castle", None, Some("oil painting")));
    assert_eq!(composed, "oil painting, a castle");
}

#[test]
fn test_compose_empty_style_falls_back_to_default() {
    let composed = compose_prompt(&params("a castle", None, Some("")));
    assert_eq!(composed, format!("{}, a castle", DEFAULT_STYLE));
}

#[test]
fn test_compose_appends_negative_prompt() {
    let composed = compose_prompt(&params("a castle", Some("blurry"), Some("sketch")));
    assert_eq!(composed, "sketch, a castle, negative prompt: blurry");
}

#[test]
fn test_compose_skips_empty_negative_prompt() {
    let composed = compose_prompt(&params("a castle", Some(""), Some("sketch")));
    assert_eq!(composed, "sketch, a castle");
}

// --- Moderation gate ---

#[tokio::test]
async fn test_gate_passes_at_exact_threshold() {
    let gate = ModerationGate::new(Arc::new(FakeClassifier::new(vec![score("unsafe", 0.5)])));
    assert_eq!(gate.check("prompt").await.unwrap(), Verdict::Pass);
}

#[tokio::test]
async fn test_gate_rejects_above_threshold() {
    let gate = ModerationGate::new(Arc::new(FakeClassifier::new(vec![score("unsafe", 0.51)])));
    assert_eq!(gate.check("prompt").await.unwrap(), Verdict::Reject);
}

#[tokio::test]
async fn test_gate_ignores_other_labels() {
    let gate = ModerationGate::new(Arc::new(FakeClassifier::new(vec![
        score("safe", 0.99),
        score("spam", 0.9),
    ])));
    assert_eq!(gate.check("prompt").await.unwrap(), Verdict::Pass);
}

#[tokio::test]
async fn test_gate_passes_when_score_missing() {
    let gate = ModerationGate::new(Arc::new(FakeClassifier::new(vec![unscored("unsafe")])));
    assert_eq!(gate.check("prompt").await.unwrap(), Verdict::Pass);
}

#[tokio::test]
async fn test_gate_propagates_provider_error() {
    let gate = ModerationGate::new(Arc::new(FailingClassifier));
    assert!(matches!(
        gate.check("prompt").await,
        Err(AppError::Provider(_))
    ));
}

// --- Full pipeline ---

#[tokio::test]
async fn test_generate_returns_image_bytes() {
    let generator = FakeImageGenerator::new(png_bytes());
    let last_prompt = generator.last_prompt.clone();

    let pipeline = pipeline(FakeClassifier::new(vec![score("safe", 0.9)]), generator);
    let bytes = pipeline
        .generate(&params("a red fox in snow", None, None))
        .await
        .unwrap();

    assert_eq!(bytes, png_bytes());
    assert_eq!(
        last_prompt.lock().as_deref(),
        Some("whimsical, illustrative style, a red fox in snow")
    );
}

#[tokio::test]
async fn test_generate_rejects_flagged_prompt_without_generation_call() {
    let generator = FakeImageGenerator::new(png_bytes());
    let generator_calls = generator.calls.clone();

    let pipeline = pipeline(FakeClassifier::new(vec![score("unsafe", 0.9)]), generator);
    let result = pipeline.generate(&params("bad prompt", None, None)).await;

    assert!(matches!(result, Err(AppError::Moderation(_))));
    assert_eq!(generator_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_oversized_prompt_makes_no_external_calls() {
    let classifier = FakeClassifier::new(vec![score("safe", 0.9)]);
    let classifier_calls = classifier.calls.clone();
    let generator = FakeImageGenerator::new(png_bytes());
    let generator_calls = generator.calls.clone();

    let long_prompt = "a".repeat(1001);
    let pipeline = pipeline(classifier, generator);
    let result = pipeline.generate(&params(&long_prompt, None, None)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(classifier_calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_validates_negative_prompt_and_style_lengths() {
    let pipeline = pipeline(
        FakeClassifier::new(vec![score("safe", 0.9)]),
        FakeImageGenerator::new(png_bytes()),
    );

    let long_negative = "b".repeat(1001);
    let result = pipeline
        .generate(&params("ok", Some(&long_negative), None))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let long_style = "c".repeat(51);
    let result = pipeline.generate(&params("ok", None, Some(&long_style))).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_generate_accepts_boundary_lengths() {
    let pipeline = pipeline(
        FakeClassifier::new(vec![score("safe", 0.9)]),
        FakeImageGenerator::new(png_bytes()),
    );

    let prompt = "a".repeat(1000);
    let negative = "b".repeat(1000);
    let style = "c".repeat(50);
    let result = pipeline
        .generate(&params(&prompt, Some(&negative), Some(&style)))
        .await;

    assert!(result.is_ok());
}

// --- Prompt enhancement ---

#[tokio::test]
async fn test_enhance_returns_trimmed_response() {
    let enhancer = PromptEnhancer::new(Arc::new(FakeTextGenerator::new(
        "  a majestic red fox, glistening snow, golden hour light  ",
    )));

    let enhanced = enhancer.enhance("a red fox").await.unwrap();
    assert_eq!(enhanced, "a majestic red fox, glistening snow, golden hour light");
}

#[tokio::test]
async fn test_enhance_empty_prompt_skips_provider() {
    let generator = FakeTextGenerator::new("should not be used");
    let calls = generator.calls.clone();

    let enhancer = PromptEnhancer::new(Arc::new(generator));
    let enhanced = enhancer.enhance("").await.unwrap();

    assert_eq!(enhanced, "");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_enhance_empty_response_falls_back_to_original() {
    let enhancer = PromptEnhancer::new(Arc::new(FakeTextGenerator::new("   ")));
    let enhanced = enhancer.enhance("a red fox").await.unwrap();
    assert_eq!(enhanced, "a red fox");
}
