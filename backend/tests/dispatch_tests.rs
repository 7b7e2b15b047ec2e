//! Call round trips through the built-in registry.

use approx::assert_relative_eq;
use serde_json::{json, Value as JsonValue};

use elephant_server::dispatch::{Arguments, CallError, Callable, CallableRegistry, Dispatcher, Parameter};
use elephant_server::error::ElephantError;
use elephant_server::models::Value;
use elephant_server::units::{Quantity, Unit};

fn call(module: &str, function: &str, body: JsonValue) -> Result<JsonValue, ElephantError> {
    let registry = CallableRegistry::with_builtins();
    Dispatcher::new(&registry).handle(module, function, body)
}

#[test]
fn test_mean_firing_rate_in_request_rate_unit() {
    let out = call(
        "statistics",
        "mean_firing_rate",
        json!({"data": {"spiketrain": [1, 2, 3, 4]}, "t_stop": 100, "units": {"time": "ms", "rate": "Hz"}}),
    )
    .unwrap();
    assert_relative_eq!(out.as_f64().unwrap(), 40.0, epsilon = 1e-9);
}

#[test]
fn test_fanofactor_takes_the_whole_list() {
    let out = call(
        "statistics",
        "fanofactor",
        json!({"data": {"spiketrains": [[1], [1, 2, 3]]}, "t_stop": 5}),
    )
    .unwrap();
    assert_relative_eq!(out.as_f64().unwrap(), 0.5);
}

#[test]
fn test_cv_broadcasts_over_spiketrains() {
    let out = call(
        "statistics",
        "cv",
        json!({"data": {"spiketrains": [[1, 2, 3], [1, 2, 4]]}, "t_stop": 5}),
    )
    .unwrap();
    let values = out.as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_relative_eq!(values[0].as_f64().unwrap(), 0.0);
    assert!(values[1].as_f64().unwrap() > 0.0);
}

#[test]
fn test_threshold_detection_from_compact_signal() {
    let out = call(
        "spike_train_generation",
        "threshold_detection",
        json!({
            "data": {"signal": [-1, 0.5, 2, -0.5, 3, 1], "threshold": 0},
            "sampling_rate": 1000,
            "units": {"time": "ms", "amplitude": "mV", "rate": "Hz"}
        }),
    )
    .unwrap();
    let train = &out["spiketrain"];
    assert_eq!(train["units"], "ms");
    assert_eq!(train["times"], json!([1.0, 4.0]));
    assert_relative_eq!(train["t_stop"].as_f64().unwrap(), 6.0);
}

#[test]
fn test_zscore_output_feeds_back() {
    let first = call(
        "signal_processing",
        "zscore",
        json!({"data": {"signal": [1, 3]}, "sampling_rate": 10}),
    )
    .unwrap();
    assert_eq!(first["signal"]["signal"], json!([-1.0, 1.0]));
    assert_eq!(first["signal"]["sampling_rate"], json!(10.0));

    let again = call("signal_processing", "zscore", json!({"data": {"signal": first}})).unwrap();
    assert_eq!(again["signal"]["signal"], json!([-1.0, 1.0]));
}

#[test]
fn test_signal_without_rate_is_deserialize_error() {
    let err = call("signal_processing", "zscore", json!({"data": {"signal": [1, 2]}})).unwrap_err();
    assert!(matches!(err, ElephantError::Deserialize(_)), "{:?}", err);
}

#[test]
fn test_unparseable_train_unit_is_deserialize_error() {
    let err = call(
        "statistics",
        "isi",
        json!({"data": {"spiketrain": {"times": [1, 2], "units": "parsecs", "t_stop": 3}}}),
    )
    .unwrap_err();
    assert_eq!(err.code(), "DESERIALIZE_ERROR");
}

#[test]
fn test_overflowing_unit_exponent_is_deserialize_error() {
    let err = call(
        "statistics",
        "isi",
        json!({"data": {"spiketrain": {"times": [1, 2], "units": "s^127*s", "t_stop": 3}}}),
    )
    .unwrap_err();
    assert!(matches!(err, ElephantError::Deserialize(_)), "{:?}", err);
}

#[test]
fn test_unbounded_bin_count_is_runtime_error() {
    for (bin_size, t_stop) in [(1e-6, 1e7), (1e-300, 1e10)] {
        let err = call(
            "conversion",
            "binned_spiketrain",
            json!({"data": {"spiketrain": [1.0], "bin_size": bin_size, "t_stop": t_stop}}),
        )
        .unwrap_err();
        assert!(matches!(err, ElephantError::Runtime(_)), "{:?}", err);
    }
}

const LENGTH_PARAMS: &[Parameter] = &[Parameter::optional("x")];

fn length(_: &mut Arguments) -> Result<Value, CallError> {
    Ok(Value::Quantity(Quantity::new(1.0, Unit::parse("m").map_err(CallError::from)?)))
}

#[test]
fn test_result_outside_every_family_is_serialize_error() {
    let mut registry = CallableRegistry::new();
    registry.register(Callable::new("geometry", "length", LENGTH_PARAMS, length));
    let err = Dispatcher::new(&registry)
        .handle("geometry", "length", json!({}))
        .unwrap_err();
    assert_eq!(err, ElephantError::Serialize("Unknown units: 'm'".to_string()));
}
