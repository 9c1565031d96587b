use super::mock::MockVisionClassifier;
use super::*;
use crate::candidate::Candidate;
use crate::events::{ClassificationEvent, DecisionSource, Diagnostics};
use crate::license::ImageLicense;
use crate::transport::mock::{MockImage, MockImageFetcher};
use parking_lot::Mutex;
use std::sync::Arc;

const URL: &str = "https://photos.example/harbour.jpg";

fn recording_diagnostics() -> (Diagnostics, Arc<Mutex<Vec<ClassificationEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let diagnostics = Diagnostics::new().with_classification(move |e| sink.lock().push(e.clone()));
    (diagnostics, events)
}

#[test]
fn test_parse_class_with_confidence() {
    assert_eq!(
        parse_classification_result("PHOTO 0.92"),
        ClassificationResult::new("PHOTO", 0.92)
    );
    assert_eq!(
        parse_classification_result("  map 1.0\n"),
        ClassificationResult::new("MAP", 1.0)
    );
}

#[test]
fn test_parse_class_with_trailing_noise() {
    assert_eq!(
        parse_classification_result("stock - shutterstock watermark"),
        ClassificationResult::new("STOCK", 0.0)
    );
    assert_eq!(
        parse_classification_result("REJECT 0.7 because of the banner text"),
        ClassificationResult::new("REJECT", 0.7)
    );
}

#[test]
fn test_parse_unrecognised_is_empty() {
    assert_eq!(
        parse_classification_result("I cannot classify this"),
        ClassificationResult::default()
    );
    assert_eq!(parse_classification_result(""), ClassificationResult::default());
    assert_eq!(parse_classification_result("   "), ClassificationResult::default());
}

#[test]
fn test_parse_out_of_range_confidence_keeps_class() {
    assert_eq!(
        parse_classification_result("SCREENSHOT 1.5"),
        ClassificationResult::new("SCREENSHOT", 0.0)
    );
    assert_eq!(
        parse_classification_result("PHOTO 0"),
        ClassificationResult::new("PHOTO", 0.0)
    );
    assert_eq!(
        parse_classification_result("PHOTO -0.4"),
        ClassificationResult::new("PHOTO", 0.0)
    );
    assert_eq!(parse_classification_result("ILLUSTRATION"), ClassificationResult::new("ILLUSTRATION", 0.0));
}

#[test]
fn test_labels_are_longest_first() {
    for pair in CLASSIFICATION_CLASSES.windows(2) {
        assert!(pair[0].len() >= pair[1].len(), "{} before {}", pair[0], pair[1]);
    }
}

#[test]
fn test_result_predicates() {
    assert!(ClassificationResult::default().is_real_photo());
    assert!(ClassificationResult::new(CLASS_PHOTO, 0.5).is_real_photo());
    assert!(!ClassificationResult::new(CLASS_MAP, 0.5).is_real_photo());

    assert!(ClassificationResult::new(CLASS_STOCK, 0.0).is_rejecting());
    assert!(ClassificationResult::new(CLASS_REJECT, 0.9).is_rejecting());
    assert!(!ClassificationResult::new(CLASS_SCREENSHOT, 0.9).is_rejecting());
    assert!(!ClassificationResult::default().is_rejecting());
}

#[test]
fn test_legacy_parser() {
    assert_eq!(parse_legacy_response(" photo."), CLASS_PHOTO);
    assert_eq!(parse_legacy_response("STOCK watermark"), CLASS_STOCK);
    assert_eq!(parse_legacy_response("reject"), CLASS_REJECT);
    assert_eq!(parse_legacy_response("SCREENSHOT 0.9"), "");
    assert_eq!(parse_legacy_response(""), "");
}

#[test]
fn test_pre_classify() {
    let safe = Candidate::new(URL, "https://unsplash.com/p").with_license(ImageLicense::Safe);
    let unknown = Candidate::new(URL, "https://blog.example/p");

    assert_eq!(pre_classify(&safe), (CLASS_PHOTO, true));
    assert_eq!(pre_classify(&unknown), ("", false));
}

#[test]
fn test_default_prompt_mentions_every_class() {
    for class in CLASSIFICATION_CLASSES {
        assert!(DEFAULT_VISION_PROMPT.contains(class), "{class} missing");
    }
}

#[test]
fn test_cache_key_prefix() {
    assert_eq!(cache_key(URL), format!("vision_cls_v2:{URL}"));
}

#[tokio::test]
async fn test_moka_cache_roundtrip() {
    let cache = MokaClassificationCache::new();
    assert!(cache.get("k").await.is_none());

    cache.set("k", ClassificationResult::new(CLASS_MAP, 0.4)).await;
    assert_eq!(
        cache.get("k").await,
        Some(ClassificationResult::new(CLASS_MAP, 0.4))
    );
    assert_eq!(cache.entry_count(), 1);
}

#[tokio::test]
async fn test_classify_bytes_without_model_is_empty() {
    let classifier = ImageClassifier::disabled();
    assert!(!classifier.is_enabled());
    assert!(classifier.classify_bytes(URL, b"img", "image/jpeg").await.is_empty());
}

#[tokio::test]
async fn test_classify_bytes_parses_and_audits() {
    let model = Arc::new(MockVisionClassifier::responding("STOCK 0.81"));
    let (diagnostics, events) = recording_diagnostics();
    let classifier = ImageClassifier::new(model.clone()).with_diagnostics(diagnostics);

    let result = classifier.classify_bytes(URL, b"img", "image/jpeg").await;

    assert_eq!(result, ClassificationResult::new(CLASS_STOCK, 0.81));
    assert_eq!(model.calls(), 1);
    assert_eq!(model.prompts()[0], DEFAULT_VISION_PROMPT);

    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        ClassificationEvent::new(URL, CLASS_STOCK, 0.81, DecisionSource::Model)
    );
}

#[tokio::test]
async fn test_classify_bytes_model_error_accepts_without_audit() {
    let model = Arc::new(MockVisionClassifier::failing("upstream 503"));
    let (diagnostics, events) = recording_diagnostics();
    let classifier = ImageClassifier::new(model.clone()).with_diagnostics(diagnostics);

    let result = classifier.classify_bytes(URL, b"img", "image/jpeg").await;

    assert!(result.is_empty());
    assert!(result.is_real_photo());
    assert_eq!(model.calls(), 1);
    assert!(events.lock().is_empty());
}

#[tokio::test]
async fn test_classify_bytes_without_bytes_skips_model() {
    let model = Arc::new(MockVisionClassifier::responding("REJECT 0.9"));
    let classifier = ImageClassifier::new(model.clone());

    assert!(classifier.classify_bytes(URL, &[], "image/jpeg").await.is_empty());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_custom_prompt_is_sent() {
    let model = Arc::new(MockVisionClassifier::responding("PHOTO"));
    let classifier = ImageClassifier::new(model.clone()).with_prompt("Is this a photo?");
    classifier.classify_bytes(URL, b"img", "image/png").await;
    assert_eq!(model.prompts(), vec!["Is this a photo?".to_string()]);

    let unchanged = ImageClassifier::disabled().with_prompt("   ");
    assert_eq!(unchanged.prompt(), DEFAULT_VISION_PROMPT);
}

#[tokio::test]
async fn test_cache_hit_skips_model() {
    let model = Arc::new(MockVisionClassifier::responding("PHOTO 0.9"));
    let cache: Arc<dyn ClassificationCache> = Arc::new(MokaClassificationCache::new());
    let classifier = ImageClassifier::new(model.clone()).with_cache(cache.clone());

    let first = classifier.classify_bytes(URL, b"img", "image/jpeg").await;
    let second = classifier.classify_bytes(URL, b"img", "image/jpeg").await;

    assert_eq!(first, second);
    assert_eq!(model.calls(), 1);
    assert_eq!(cache.get(&cache_key(URL)).await, Some(first));
}

#[tokio::test]
async fn test_model_errors_are_not_cached() {
    let model = Arc::new(MockVisionClassifier::scripted([
        Err("timeout".to_string()),
        Ok("MAP 0.6".to_string()),
    ]));
    let classifier = ImageClassifier::new(model.clone())
        .with_cache(Arc::new(MokaClassificationCache::new()));

    assert!(classifier.classify_bytes(URL, b"img", "image/jpeg").await.is_empty());
    assert_eq!(
        classifier.classify_bytes(URL, b"img", "image/jpeg").await,
        ClassificationResult::new(CLASS_MAP, 0.6)
    );
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_unparseable_answers_are_not_cached() {
    let model = Arc::new(MockVisionClassifier::scripted([
        Ok("I cannot classify this".to_string()),
        Ok("STOCK 0.9".to_string()),
    ]));
    let cache: Arc<dyn ClassificationCache> = Arc::new(MokaClassificationCache::new());
    let classifier = ImageClassifier::new(model.clone()).with_cache(cache.clone());

    assert!(classifier.classify_bytes(URL, b"img", "image/jpeg").await.is_empty());
    assert_eq!(cache.get(&cache_key(URL)).await, None);

    let retried = classifier.classify_bytes(URL, b"img", "image/jpeg").await;
    assert_eq!(retried, ClassificationResult::new(CLASS_STOCK, 0.9));
    assert_eq!(model.calls(), 2);
    assert_eq!(cache.get(&cache_key(URL)).await, Some(retried));
}

#[tokio::test]
async fn test_classify_url_does_not_cache_unparseable_answer() {
    let fetcher = Arc::new(
        MockImageFetcher::new().with_image(URL, MockImage::image(vec![1; 64], "image/jpeg", None)),
    );
    let model = Arc::new(MockVisionClassifier::scripted([
        Ok("no idea".to_string()),
        Ok("PHOTO 0.8".to_string()),
    ]));
    let classifier = ImageClassifier::new(model.clone())
        .with_fetcher(fetcher)
        .with_cache(Arc::new(MokaClassificationCache::new()));

    assert!(classifier.classify_url(URL).await.is_empty());
    assert_eq!(
        classifier.classify_url(URL).await,
        ClassificationResult::new(CLASS_PHOTO, 0.8)
    );
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_classify_url_downloads_preview() {
    let fetcher = Arc::new(
        MockImageFetcher::new().with_image(URL, MockImage::image(vec![1; 64], "image/jpeg", None)),
    );
    let model = Arc::new(MockVisionClassifier::responding("ILLUSTRATION 0.77"));
    let classifier = ImageClassifier::new(model.clone()).with_fetcher(fetcher.clone());

    let result = classifier.classify_url(URL).await;

    assert_eq!(result, ClassificationResult::new(CLASS_ILLUSTRATION, 0.77));
    assert_eq!(fetcher.download_count(URL), 1);
    assert!(!classifier.is_real_photo(URL).await);
}

#[tokio::test]
async fn test_classify_url_preview_failure_accepts() {
    let fetcher = Arc::new(MockImageFetcher::new());
    let model = Arc::new(MockVisionClassifier::responding("REJECT 0.99"));
    let classifier = ImageClassifier::new(model.clone()).with_fetcher(fetcher);

    assert!(classifier.classify_url(URL).await.is_empty());
    assert!(classifier.is_real_photo(URL).await);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_mock_classifier_repeats_last_answer() {
    let model = MockVisionClassifier::scripted([Ok("PHOTO".to_string())]);
    let images = [ImageInput::from_bytes(b"x", "image/png")];

    assert_eq!(model.classify("p", &images).await.unwrap(), "PHOTO");
    assert_eq!(model.classify("p", &images).await.unwrap(), "PHOTO");
    assert!(model.classify("p", &[]).await.is_err());
    assert_eq!(model.calls(), 3);
}
