//! Spike trains derived from continuous signals.

use crate::dispatch::{Arguments, CallError, Callable, Parameter};
use crate::models::{EventTrain, Value};
use crate::units::Quantity;

const MODULE: &str = "spike_train_generation";

pub(super) fn callables() -> Vec<Callable> {
    const THRESHOLD: &[Parameter] = &[
        Parameter::required("signal"),
        Parameter::optional("threshold"),
        Parameter::optional("sign"),
    ];
    vec![Callable::new(MODULE, "threshold_detection", THRESHOLD, threshold_detection)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    Above,
    Below,
}

/// Times at which the signal crosses `threshold`.
///
/// A crossing is recorded at the first sample past the threshold. A plain
/// number is read in the signal's own unit. The resulting train spans the
/// whole signal.
fn threshold_detection(args: &mut Arguments) -> Result<Value, CallError> {
    let signal = args.signal("signal")?;
    let threshold = match args.optional_value("threshold")? {
        None => 0.0,
        Some(Value::Quantity(q)) => q
            .rescale(signal.unit())?
            .value()
            .ok_or_else(|| CallError::failed("threshold must be a scalar"))?,
        Some(other) => other.as_f64().unwrap_or(0.0),
    };
    let sign = match args.optional_str("sign")?.as_deref() {
        None | Some("above") => Crossing::Above,
        Some("below") => Crossing::Below,
        Some(other) => {
            return Err(CallError::failed(format!(
                "sign must be 'above' or 'below', got '{}'",
                other
            )))
        }
    };

    let crossed = |prev: f64, cur: f64| match sign {
        Crossing::Above => prev < threshold && cur >= threshold,
        Crossing::Below => prev > threshold && cur <= threshold,
    };
    let times: Vec<f64> = signal
        .samples()
        .windows(2)
        .enumerate()
        .filter(|(_, w)| crossed(w[0], w[1]))
        .map(|(i, _)| signal.sample_time(i + 1))
        .collect();

    let time_unit = signal.t_start().unit().clone();
    let train = EventTrain::new(
        times,
        time_unit.clone(),
        signal.t_start(),
        &Quantity::new(signal.t_stop(), time_unit),
    )?;
    Ok(Value::EventTrain(train))
}
