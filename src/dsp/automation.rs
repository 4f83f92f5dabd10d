#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Parameter Automation
====================

A voice's amplitude is not advanced sample by sample from note events. It is
described up front as a timeline of scheduled events, and anyone holding the
timeline can ask "what is the value at time t?".

Vocabulary
----------

  event       (time, value, curve). `time` is absolute, in seconds on the
              engine clock. `value` is the target reached AT `time`.

  curve       How the value travels from the previous event to this one:
                Set          jump to `value` at `time`
                Linear       straight line from the previous event
                Exponential  constant-ratio curve from the previous event

  start point The event before a ramp. A ramp always begins at the previous
              event's (time, value); with no previous event it begins at
              (0.0, default value).


The Shape of One Note
---------------------

  value
    1.0 ┐     ╱╲
        │    ╱  ╲_____________
    0.7 │   ╱                 |╲
        │  ╱                  | ╲
  0.001 └─╱───────────────────┴──╲──→ time
        set lin  exp          set exp
        t0  +a   +a+d         t1  t1+r

Release is scheduled as: read value_at(t1), cancel everything at or after
t1, set that value at t1, exponential ramp to the floor. Cancelling alone
would drop an in-flight ramp and snap the value back to its start point;
re-setting the snapshot keeps the curve continuous.


Exponential Ramps
-----------------

    v(t) = v0 * (v1 / v0) ^ ((t - t0) / (t1 - t0))

Zero and sign changes have no exponential path, so a ramp whose endpoints
are not both strictly positive (or both strictly negative) holds v0 until
t1 and then takes v1. This is why release targets 0.001, not 0.0.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Set,
    Linear,
    Exponential,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutomationEvent {
    pub time: f64,
    pub value: f32,
    pub curve: Curve,
}

impl AutomationEvent {
    pub fn set(time: f64, value: f32) -> Self {
        Self {
            time,
            value,
            curve: Curve::Set,
        }
    }

    pub fn linear(time: f64, value: f32) -> Self {
        Self {
            time,
            value,
            curve: Curve::Linear,
        }
    }

    pub fn exponential(time: f64, value: f32) -> Self {
        Self {
            time,
            value,
            curve: Curve::Exponential,
        }
    }
}

/// A parameter whose future is a list of scheduled events.
///
/// Implemented by the timeline itself and by anything that forwards a
/// timeline to an audio engine, so envelope logic can be exercised against
/// a recording fake.
pub trait ScheduledEnvelope {
    /// Add an event. Events at equal times keep insertion order.
    fn schedule(&mut self, event: AutomationEvent);

    /// Drop every event at or after `from`.
    fn cancel_scheduled(&mut self, from: f64);

    /// The value in effect at `time`.
    fn value_at(&self, time: f64) -> f32;

    /// Replace everything from `at` on with `from` held at `at` and an
    /// exponential ramp to `target` at `until`.
    ///
    /// Timelines forwarded to another thread apply this as one unit, so the
    /// other side never sees the cancel without the ramp that follows it.
    fn release_from(&mut self, at: f64, from: f32, until: f64, target: f32) {
        self.cancel_scheduled(at);
        self.schedule(AutomationEvent::set(at, from));
        self.schedule(AutomationEvent::exponential(until, target));
    }
}

const EVENT_CAPACITY: usize = 8;

/// Time-ordered automation timeline.
#[derive(Debug, Clone)]
pub struct AutomationParam {
    default_value: f32,
    events: Vec<AutomationEvent>,
}

impl AutomationParam {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::with_capacity(EVENT_CAPACITY),
        }
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Forget events that can no longer influence any value at or after
    /// `time`. The last event at or before `time` is kept as the start
    /// point of whatever follows.
    pub fn prune_before(&mut self, time: f64) {
        let reached = self.events.partition_point(|e| e.time <= time);
        if reached > 1 {
            self.events.drain(..reached - 1);
        }
    }
}

impl ScheduledEnvelope for AutomationParam {
    fn schedule(&mut self, event: AutomationEvent) {
        if !event.time.is_finite() || !event.value.is_finite() {
            return;
        }
        let index = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(index, event);
    }

    fn cancel_scheduled(&mut self, from: f64) {
        let keep = self.events.partition_point(|e| e.time < from);
        self.events.truncate(keep);
    }

    fn value_at(&self, time: f64) -> f32 {
        let reached = self.events.partition_point(|e| e.time <= time);

        let (start_time, start_value) = match reached.checked_sub(1) {
            Some(i) => (self.events[i].time, self.events[i].value),
            None => (0.0, self.default_value),
        };

        match self.events.get(reached) {
            Some(next) if next.curve != Curve::Set => {
                interpolate(start_time, start_value, next, time)
            }
            _ => start_value,
        }
    }
}

fn interpolate(start_time: f64, start_value: f32, end: &AutomationEvent, time: f64) -> f32 {
    let span = end.time - start_time;
    if span <= 0.0 {
        return end.value;
    }
    let progress = ((time - start_time) / span).clamp(0.0, 1.0) as f32;

    match end.curve {
        Curve::Set => start_value,
        Curve::Linear => start_value + (end.value - start_value) * progress,
        Curve::Exponential => {
            if start_value * end.value > 0.0 {
                start_value * (end.value / start_value).powf(progress)
            } else {
                start_value
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_value_holds_without_events() {
        let param = AutomationParam::new(1.0);
        approx(param.value_at(0.0), 1.0);
        approx(param.value_at(42.0), 1.0);
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_event() {
        let mut param = AutomationParam::new(1.0);
        param.schedule(AutomationEvent::set(1.0, 0.0));
        param.schedule(AutomationEvent::linear(1.5, 1.0));

        approx(param.value_at(1.0), 0.0);
        approx(param.value_at(1.25), 0.5);
        approx(param.value_at(1.5), 1.0);
        approx(param.value_at(9.0), 1.0);
    }

    #[test]
    fn exponential_ramp_keeps_constant_ratio() {
        let mut param = AutomationParam::new(1.0);
        param.schedule(AutomationEvent::set(0.0, 1.0));
        param.schedule(AutomationEvent::exponential(1.0, 0.25));

        approx(param.value_at(0.5), 0.5);
        approx(param.value_at(1.0), 0.25);
    }

    #[test]
    fn exponential_ramp_from_zero_holds_then_jumps() {
        let mut param = AutomationParam::new(1.0);
        param.schedule(AutomationEvent::set(0.0, 0.0));
        param.schedule(AutomationEvent::exponential(1.0, 0.5));

        approx(param.value_at(0.99), 0.0);
        approx(param.value_at(1.0), 0.5);
    }

    #[test]
    fn out_of_order_scheduling_is_sorted() {
        let mut param = AutomationParam::new(0.0);
        param.schedule(AutomationEvent::linear(2.0, 1.0));
        param.schedule(AutomationEvent::set(1.0, 0.0));

        let times: Vec<f64> = param.events().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![1.0, 2.0]);
        approx(param.value_at(1.5), 0.5);
    }

    #[test]
    fn cancel_drops_pending_ramp_and_reverts_to_start_point() {
        let mut param = AutomationParam::new(1.0);
        param.schedule(AutomationEvent::set(0.0, 0.0));
        param.schedule(AutomationEvent::linear(1.0, 1.0));

        param.cancel_scheduled(0.5);

        assert_eq!(param.events().len(), 1);
        approx(param.value_at(0.75), 0.0);
    }

    #[test]
    fn non_finite_events_are_ignored() {
        let mut param = AutomationParam::new(0.5);
        param.schedule(AutomationEvent::set(f64::NAN, 1.0));
        param.schedule(AutomationEvent::set(0.0, f32::INFINITY));
        assert!(param.events().is_empty());
    }

    #[test]
    fn release_from_rewrites_the_tail() {
        let mut param = AutomationParam::new(0.0);
        param.schedule(AutomationEvent::set(0.0, 0.0));
        param.schedule(AutomationEvent::linear(1.0, 1.0));

        param.release_from(0.5, 0.5, 1.5, 0.005);

        let curves: Vec<Curve> = param.events().iter().map(|e| e.curve).collect();
        assert_eq!(curves, vec![Curve::Set, Curve::Set, Curve::Exponential]);
        approx(param.value_at(0.5), 0.5);
        approx(param.value_at(1.0), 0.05);
        approx(param.value_at(2.0), 0.005);
    }

    #[test]
    fn pruning_preserves_future_values() {
        let mut param = AutomationParam::new(1.0);
        param.schedule(AutomationEvent::set(0.0, 0.0));
        param.schedule(AutomationEvent::linear(0.05, 1.0));
        param.schedule(AutomationEvent::exponential(0.15, 0.7));

        let before = param.value_at(0.1);
        param.prune_before(0.1);

        assert_eq!(param.events().len(), 2);
        approx(param.value_at(0.1), before);
        approx(param.value_at(0.2), 0.7);
    }
}
