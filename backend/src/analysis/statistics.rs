//! Spike train statistics.

use crate::dispatch::{Arguments, CallError, Callable, Parameter};
use crate::models::{EventTrain, Value};
use crate::units::Quantity;

const MODULE: &str = "statistics";

pub(super) fn callables() -> Vec<Callable> {
    const MEAN_FIRING_RATE: &[Parameter] = &[
        Parameter::required("spiketrain"),
        Parameter::optional("t_start"),
        Parameter::optional("t_stop"),
    ];
    const SINGLE_TRAIN: &[Parameter] = &[Parameter::required("spiketrain")];
    const MANY_TRAINS: &[Parameter] = &[Parameter::required("spiketrains")];

    vec![
        Callable::new(MODULE, "mean_firing_rate", MEAN_FIRING_RATE, mean_firing_rate),
        Callable::new(MODULE, "isi", SINGLE_TRAIN, isi),
        Callable::new(MODULE, "cv", SINGLE_TRAIN, cv),
        Callable::new(MODULE, "fanofactor", MANY_TRAINS, fanofactor),
    ]
}

/// Events in `[t_start, t_stop]` divided by the window length.
fn mean_firing_rate(args: &mut Arguments) -> Result<Value, CallError> {
    let train = args.event_train("spiketrain")?;
    let t_start = bound_in_train_unit(&train, args.optional_quantity("t_start")?)?.unwrap_or(train.t_start());
    let t_stop = bound_in_train_unit(&train, args.optional_quantity("t_stop")?)?.unwrap_or(train.t_stop());

    let duration = t_stop - t_start;
    if duration <= 0.0 {
        return Err(CallError::failed(format!(
            "t_stop ({}) must be greater than t_start ({})",
            t_stop, t_start
        )));
    }
    let count = train
        .times()
        .iter()
        .filter(|t| **t >= t_start && **t <= t_stop)
        .count();
    Ok(Value::Quantity(Quantity::new(
        count as f64 / duration,
        train.unit().reciprocal()?,
    )))
}

/// Intervals between consecutive events.
fn isi(args: &mut Arguments) -> Result<Value, CallError> {
    let train = args.event_train("spiketrain")?;
    Ok(Value::Quantity(Quantity::new(intervals(train.times()), train.unit().clone())))
}

/// Coefficient of variation of the inter-spike intervals.
fn cv(args: &mut Arguments) -> Result<Value, CallError> {
    let train = args.event_train("spiketrain")?;
    let isis = intervals(train.times());
    if isis.len() < 2 {
        return Err(CallError::failed(format!(
            "cv needs at least 3 spikes, got {}",
            train.len()
        )));
    }
    let (mean, std) = mean_std(&isis);
    if mean == 0.0 {
        return Err(CallError::failed("mean inter-spike interval is zero"));
    }
    Ok(Value::from(std / mean))
}

/// Variance over mean of the spike counts.
fn fanofactor(args: &mut Arguments) -> Result<Value, CallError> {
    let trains = args.event_trains("spiketrains")?;
    if trains.is_empty() {
        return Err(CallError::failed("fanofactor needs at least one spike train"));
    }
    let counts: Vec<f64> = trains.iter().map(|t| t.len() as f64).collect();
    let (mean, std) = mean_std(&counts);
    if mean == 0.0 {
        return Err(CallError::failed("division by zero: mean spike count is 0"));
    }
    Ok(Value::from(std * std / mean))
}

fn intervals(times: &[f64]) -> Vec<f64> {
    times.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Population mean and standard deviation.
pub(super) fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn bound_in_train_unit(train: &EventTrain, bound: Option<Quantity>) -> Result<Option<f64>, CallError> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    bound
        .rescale(train.unit())?
        .value()
        .map(Some)
        .ok_or_else(|| CallError::failed("time bounds must be scalars"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Kwargs;
    use crate::units::Unit;
    use approx::assert_relative_eq;

    fn train(times: &[f64], t_stop: f64) -> EventTrain {
        EventTrain::new(
            times.to_vec(),
            Unit::millisecond(),
            &Quantity::new(0.0, Unit::millisecond()),
            &Quantity::new(t_stop, Unit::millisecond()),
        )
        .unwrap()
    }

    fn find(name: &str) -> Callable {
        callables()
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap()
    }

    fn single(train: EventTrain) -> Kwargs {
        Kwargs::from([("spiketrain".to_string(), Value::EventTrain(train))])
    }

    #[test]
    fn test_mean_firing_rate_in_inverse_train_unit() {
        let out = find("mean_firing_rate").call(single(train(&[1.0, 2.0, 3.0, 4.0], 100.0))).unwrap();
        let Value::Quantity(rate) = out else {
            panic!("expected a quantity");
        };
        assert_eq!(rate.unit().symbol(), "1/ms");
        assert_relative_eq!(rate.value().unwrap(), 0.04);
        let hz = rate.rescale(&Unit::hertz()).unwrap();
        assert_relative_eq!(hz.value().unwrap(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mean_firing_rate_window() {
        let mut kwargs = single(train(&[1.0, 2.0, 3.0, 4.0], 100.0));
        kwargs.insert("t_start".into(), Value::Quantity(Quantity::new(2.0, Unit::millisecond())));
        kwargs.insert(
            "t_stop".into(),
            Value::Quantity(Quantity::new(0.004, Unit::parse("s").unwrap())),
        );
        let Value::Quantity(rate) = find("mean_firing_rate").call(kwargs).unwrap() else {
            panic!("expected a quantity");
        };
        assert_relative_eq!(rate.value().unwrap(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_mean_firing_rate_empty_window() {
        let err = find("mean_firing_rate").call(single(train(&[], 0.0))).unwrap_err();
        assert!(err.to_string().contains("greater than"));
    }

    #[test]
    fn test_isi() {
        let Value::Quantity(isi) = find("isi").call(single(train(&[1.0, 1.5, 4.0], 5.0))).unwrap() else {
            panic!("expected a quantity");
        };
        assert_eq!(isi.magnitude().as_slice(), &[0.5, 2.5]);
        assert_eq!(isi.unit().symbol(), "ms");
    }

    #[test]
    fn test_cv_regular_train_is_zero() {
        let out = find("cv").call(single(train(&[1.0, 2.0, 3.0, 4.0], 5.0))).unwrap();
        assert_relative_eq!(out.as_f64().unwrap(), 0.0);
    }

    #[test]
    fn test_cv_needs_three_spikes() {
        assert!(find("cv").call(single(train(&[1.0, 2.0], 5.0))).is_err());
    }

    #[test]
    fn test_fanofactor() {
        let trains = Value::List(vec![
            Value::EventTrain(train(&[1.0], 5.0)),
            Value::EventTrain(train(&[1.0, 2.0, 3.0], 5.0)),
        ]);
        let out = find("fanofactor")
            .call(Kwargs::from([("spiketrains".to_string(), trains)]))
            .unwrap();
        // counts 1 and 3: variance 1, mean 2
        assert_relative_eq!(out.as_f64().unwrap(), 0.5);
    }

    #[test]
    fn test_fanofactor_zero_mean() {
        let trains = Value::List(vec![Value::EventTrain(train(&[], 5.0))]);
        let err = find("fanofactor")
            .call(Kwargs::from([("spiketrains".to_string(), trains)]))
            .unwrap_err();
        assert!(err.to_string().contains("division by zero"));
    }
}
