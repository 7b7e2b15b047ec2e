//! One call round trip: resolve, deserialize, invoke, serialize.

use log::{debug, warn};
use serde_json::Value as JsonValue;

use super::callable::Callable;
use super::registry::CallableRegistry;
use crate::codec::{self, RequestEnvelope};
use crate::error::{ElephantError, ElephantResult};
use crate::models::{Kwargs, Value};
use crate::units::{UnitOverrides, UnitRegistry};

/// Parameter a callable declares when it works on a single train.
const SINGLE_TRAIN: &str = "spiketrain";
/// Payload key carrying several trains.
const MANY_TRAINS: &str = "spiketrains";

/// Runs calls against a registry.
///
/// Holds no per-request state; every call builds its own [`UnitRegistry`].
#[derive(Debug, Clone)]
pub struct Dispatcher<'r> {
    registry: &'r CallableRegistry,
    default_units: UnitOverrides,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r CallableRegistry) -> Self {
        Self::with_default_units(registry, UnitOverrides::default())
    }

    /// Units not given by a request fall back to `default_units`, then to ms/mV/Hz.
    pub fn with_default_units(registry: &'r CallableRegistry, default_units: UnitOverrides) -> Self {
        Self {
            registry,
            default_units,
        }
    }

    /// Handle `module.call` with a JSON request body.
    pub fn handle(&self, module: &str, call: &str, body: JsonValue) -> ElephantResult<JsonValue> {
        validate_name("module", module)?;
        validate_name("function", call)?;
        let callable = self.registry.resolve(module, call)?;

        let envelope = RequestEnvelope::from_json(body)?;
        let units = UnitRegistry::new(&envelope.units.or(&self.default_units))?;
        let kwargs = codec::deserialize(&envelope, &units)?;

        let result = invoke(callable, kwargs)?;

        codec::serialize(&result, &units).map_err(|e| {
            warn!("serializing result of {}.{} failed: {}", module, call, e);
            ElephantError::from(e)
        })
    }
}

/// Invoke `callable`, broadcasting over `spiketrains` when it takes a single `spiketrain`.
///
/// A broadcast call runs once per train, in order, with the remaining keyword
/// arguments passed to every invocation.
pub fn invoke(callable: &Callable, mut kwargs: Kwargs) -> ElephantResult<Value> {
    let runtime = |e: super::CallError| ElephantError::Runtime(e.to_string());

    if !(callable.accepts(SINGLE_TRAIN) && kwargs.contains_key(MANY_TRAINS)) {
        debug!("calling {}.{}", callable.module(), callable.name());
        return callable.call(kwargs).map_err(runtime);
    }

    let trains = match kwargs.remove(MANY_TRAINS) {
        Some(Value::List(trains)) => trains,
        Some(other) => {
            return Err(ElephantError::Runtime(format!(
                "'{}' must be a list, got {}",
                MANY_TRAINS,
                other.kind()
            )))
        }
        None => Vec::new(),
    };
    debug!(
        "broadcasting {}.{} over {} spike trains",
        callable.module(),
        callable.name(),
        trains.len()
    );
    trains
        .into_iter()
        .map(|train| {
            let mut call_kwargs = kwargs.clone();
            call_kwargs.insert(SINGLE_TRAIN.to_string(), train);
            callable.call(call_kwargs)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
        .map_err(runtime)
}

fn validate_name(kind: &str, name: &str) -> ElephantResult<()> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ElephantError::InvalidRequest(format!("invalid {} name '{}'", kind, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::callable::{Arguments, CallError, Parameter};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TRAIN_PARAMS: &[Parameter] = &[Parameter::required("spiketrain"), Parameter::optional("offset")];

    fn count_spikes(args: &mut Arguments) -> Result<Value, CallError> {
        let train = args.event_train("spiketrain")?;
        let offset = args.optional_value("offset")?.and_then(|v| v.as_f64()).unwrap_or(0.0);
        Ok(Value::from(train.len() as f64 + offset))
    }

    static DIVIDE_CALLS: AtomicUsize = AtomicUsize::new(0);

    const DIVIDE_PARAMS: &[Parameter] = &[Parameter::required("a"), Parameter::required("b")];

    fn divide(args: &mut Arguments) -> Result<Value, CallError> {
        DIVIDE_CALLS.fetch_add(1, Ordering::SeqCst);
        let a = args.take("a").and_then(|v| v.as_f64()).unwrap_or(f64::NAN);
        let b = args.take("b").and_then(|v| v.as_f64()).unwrap_or(f64::NAN);
        if b == 0.0 {
            return Err(CallError::failed("division by zero"));
        }
        Ok(Value::from(a / b))
    }

    fn registry() -> CallableRegistry {
        let mut registry = CallableRegistry::new();
        registry.register(Callable::new("test", "count_spikes", TRAIN_PARAMS, count_spikes));
        registry.register(Callable::new("test", "divide", DIVIDE_PARAMS, divide));
        registry
    }

    #[test]
    fn test_broadcast_over_spiketrains() {
        let registry = registry();
        let out = Dispatcher::new(&registry)
            .handle(
                "test",
                "count_spikes",
                json!({"data": {"spiketrains": [[1], [2, 3]], "offset": 10}, "t_stop": 5}),
            )
            .unwrap();
        assert_eq!(out, json!([11.0, 12.0]));
    }

    #[test]
    fn test_broadcast_preserves_order() {
        let registry = registry();
        let out = Dispatcher::new(&registry)
            .handle(
                "test",
                "count_spikes",
                json!({"data": {"spiketrains": [[1, 2, 3], [], [4]]}, "t_stop": 5}),
            )
            .unwrap();
        assert_eq!(out, json!([3.0, 0.0, 1.0]));
    }

    #[test]
    fn test_direct_call() {
        let registry = registry();
        let out = Dispatcher::new(&registry)
            .handle("test", "divide", json!({"data": {"a": 6, "b": 3}}))
            .unwrap();
        assert_eq!(out, json!(2.0));
    }

    #[test]
    fn test_callable_failure_is_runtime_error() {
        let registry = registry();
        let before = DIVIDE_CALLS.load(Ordering::SeqCst);
        let err = Dispatcher::new(&registry)
            .handle("test", "divide", json!({"data": {"a": 1, "b": 0}}))
            .unwrap_err();
        assert_eq!(err, ElephantError::Runtime("division by zero".to_string()));
        assert!(DIVIDE_CALLS.load(Ordering::SeqCst) > before);
    }

    #[test]
    fn test_malformed_payload_is_deserialize_error() {
        let registry = registry();
        let err = Dispatcher::new(&registry)
            .handle("test", "count_spikes", json!({"data": {"spiketrain": {"t_stop": 3}}}))
            .unwrap_err();
        assert!(matches!(err, ElephantError::Deserialize(_)), "{:?}", err);
    }

    #[test]
    fn test_bad_unit_override_is_deserialize_error() {
        let registry = registry();
        let err = Dispatcher::new(&registry)
            .handle("test", "divide", json!({"data": {"a": 1, "b": 2}, "units": {"time": "bogus"}}))
            .unwrap_err();
        assert!(matches!(err, ElephantError::Deserialize(ref msg) if msg.contains("bogus")));
    }

    #[test]
    fn test_unknown_target() {
        let registry = registry();
        let dispatcher = Dispatcher::new(&registry);
        assert!(matches!(
            dispatcher.handle("nope", "divide", json!({})),
            Err(ElephantError::NotFound(_))
        ));
        assert!(matches!(
            dispatcher.handle("test", "nope", json!({})),
            Err(ElephantError::NotFound(_))
        ));
        assert!(matches!(
            dispatcher.handle("test", "../etc", json!({})),
            Err(ElephantError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_unexpected_keyword_is_runtime_error() {
        let registry = registry();
        let err = Dispatcher::new(&registry)
            .handle("test", "divide", json!({"data": {"a": 1, "b": 2, "c": 3}}))
            .unwrap_err();
        assert!(matches!(err, ElephantError::Runtime(ref msg) if msg.contains("'c'")));
    }

    #[test]
    fn test_default_units_apply_when_request_has_none() {
        let registry = registry();
        let dispatcher = Dispatcher::with_default_units(
            &registry,
            UnitOverrides {
                time: Some("us".to_string()),
                ..Default::default()
            },
        );
        assert!(dispatcher
            .handle("test", "count_spikes", json!({"data": {"spiketrain": [1]}}))
            .is_ok());
        assert!(matches!(
            dispatcher.handle("test", "count_spikes", json!({"data": {"spiketrain": [1]}, "units": {"time": "mV"}})),
            Err(ElephantError::Deserialize(_))
        ));
    }
}
