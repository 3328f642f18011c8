//! End-to-end dispatch behavior over deterministic backends.

use std::sync::Arc;

use housecast::backends::local::LocalGraphBackend;
use housecast::dispatch::Dispatcher;
use housecast::model::ModelHandle;
use housecast::scaler::ScalerTable;
use housecast::types::{FeatureVector, Mode, PredictionResult, RawFeatureForm};

use crate::mock_backend::{linear_artifact, CountingFetcher, MockBackend, SharedMock};

fn sample() -> FeatureVector {
    FeatureVector::new(25.0, 2500.0, 500.0, 1200.0).unwrap()
}

fn full_form() -> RawFeatureForm {
    RawFeatureForm {
        housing_median_age: Some("25".into()),
        total_rooms: Some("2500".into()),
        total_bedrooms: Some("500".into()),
        population: Some("1200".into()),
    }
}

/// A dispatcher with all three modes backed by mocks, returned alongside
/// the shared mock handles.
fn full_dispatcher() -> (Dispatcher, Arc<MockBackend>, Arc<MockBackend>, Arc<MockBackend>) {
    let hard_code = Arc::new(MockBackend::new("hard-code", 111000.0));
    let tf_serving = Arc::new(MockBackend::new("tf-serving", 222000.0));
    let tf_js = Arc::new(MockBackend::new("tf-js", 333000.0));

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Mode::HardCode, Box::new(SharedMock(hard_code.clone())));
    dispatcher.register(Mode::TfServing, Box::new(SharedMock(tf_serving.clone())));
    dispatcher.register(Mode::TfJs, Box::new(SharedMock(tf_js.clone())));
    (dispatcher, hard_code, tf_serving, tf_js)
}

#[tokio::test]
async fn test_every_mode_resolves_to_exactly_one_variant() {
    let (dispatcher, _, _, _) = full_dispatcher();

    for (mode, expected) in [
        (Mode::HardCode, 111000.0),
        (Mode::TfServing, 222000.0),
        (Mode::TfJs, 333000.0),
    ] {
        let result = dispatcher.predict(mode, &sample()).await;
        // Tagged enum: exactly one variant, never both, never neither.
        assert_eq!(result.price(), Some(expected));
        assert!(result.reason().is_none());
    }
}

#[tokio::test]
async fn test_failure_then_resubmission_replaces_result() {
    let (dispatcher, hard_code, _, _) = full_dispatcher();

    // First request succeeds.
    let result = dispatcher.predict(Mode::HardCode, &sample()).await;
    assert_eq!(result.price(), Some(111000.0));

    // Backend goes down: the new result is Err with the transport reason,
    // carrying no stale price from the earlier success.
    hard_code.set_error("connection refused");
    let result = dispatcher.predict(Mode::HardCode, &sample()).await;
    assert!(result.price().is_none());
    assert!(result.reason().unwrap().contains("connection refused"));

    // Explicit resubmission after recovery clears the error state.
    hard_code.clear_error();
    let result = dispatcher.predict(Mode::HardCode, &sample()).await;
    assert_eq!(result.price(), Some(111000.0));
    assert!(result.reason().is_none());
}

#[tokio::test]
async fn test_no_automatic_retry() {
    let (dispatcher, hard_code, _, _) = full_dispatcher();
    hard_code.set_error("down");

    let _ = dispatcher.predict(Mode::HardCode, &sample()).await;
    // One request, one backend call — the core never retries on its own.
    assert_eq!(hard_code.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_mode_string_never_falls_back() {
    let (dispatcher, hard_code, tf_serving, tf_js) = full_dispatcher();

    let result = dispatcher.predict_form("sklearn", &full_form()).await;
    assert!(matches!(result, PredictionResult::Err { .. }));
    assert!(result.reason().unwrap().contains("sklearn"));

    // No backend was consulted.
    assert_eq!(hard_code.call_count(), 0);
    assert_eq!(tf_serving.call_count(), 0);
    assert_eq!(tf_js.call_count(), 0);
}

#[tokio::test]
async fn test_validation_rejected_before_dispatch() {
    let (dispatcher, hard_code, _, _) = full_dispatcher();

    let mut form = full_form();
    form.total_bedrooms = None;
    let result = dispatcher.predict_form("hard-code", &form).await;
    assert!(result.reason().unwrap().contains("total_bedrooms"));
    assert_eq!(hard_code.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_tf_js_predictions_share_one_artifact_fetch() {
    let fetcher = Arc::new(CountingFetcher::new(&linear_artifact()));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        Mode::TfJs,
        Box::new(LocalGraphBackend::new(
            ScalerTable::default(),
            ModelHandle::new("mock://model.json", fetcher.clone()),
        )),
    );
    let dispatcher = Arc::new(dispatcher);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.predict(Mode::TfJs, &sample()).await })
        })
        .collect();

    let mut prices = Vec::new();
    for task in tasks {
        let result = task.await.unwrap();
        prices.push(result.price().expect("local prediction should succeed"));
    }

    // All callers awaited the same in-flight load.
    assert_eq!(fetcher.fetch_count(), 1);
    // And the model is deterministic: identical inputs, identical prices.
    for price in &prices {
        assert_eq!(*price, prices[0]);
    }
}

#[tokio::test]
async fn test_local_pipeline_through_dispatcher() {
    let fetcher = Arc::new(CountingFetcher::new(&linear_artifact()));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(
        Mode::TfJs,
        Box::new(LocalGraphBackend::new(
            ScalerTable::default(),
            ModelHandle::new("mock://model.json", fetcher),
        )),
    );

    // Table minimums → all-zero tensor → price equals the model bias.
    let floor = FeatureVector::new(1.0, 2.0, 1.0, 5.0).unwrap();
    let result = dispatcher.predict(Mode::TfJs, &floor).await;
    assert!((result.price().unwrap() - 50000.0).abs() < 1.0);
}
