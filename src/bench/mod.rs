//! Measures the mean duration of an operation over repeated trials.
//!
//! Each trial has two steps. `prepare` builds a fresh, owned input and is not timed; `measured`
//! consumes that input and is timed. Every trial counts toward the mean: there is no warm-up,
//! outlier rejection, or retry. The first failure aborts the run.

pub mod suite;

use std::fmt;
use std::hint::black_box;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// A source of monotonic timestamps.
pub trait Clock {
    /// Time elapsed since some fixed, arbitrary origin.
    fn now(&self) -> Duration;
}

/// A `Clock` backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Receives the result of each benchmark.
pub trait MetricsSink {
    fn report(&mut self, label: &str, mean: Duration);
}

impl<S: MetricsSink + ?Sized> MetricsSink for &mut S {
    fn report(&mut self, label: &str, mean: Duration) {
        (**self).report(label, mean)
    }
}

/// Reports to both sinks, in order.
impl<A: MetricsSink, B: MetricsSink> MetricsSink for (A, B) {
    fn report(&mut self, label: &str, mean: Duration) {
        self.0.report(label, mean);
        self.1.report(label, mean);
    }
}

/// Emits each result as a `tracing` event at `INFO`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn report(&mut self, label: &str, mean: Duration) {
        tracing::info!(label, mean_ms = millis(mean), "benchmark result");
    }
}

/// Collects results into a table of labels and mean durations.
#[derive(Clone, Debug, Default)]
pub struct Report {
    rows: Vec<(String, Duration)>,
}

impl Report {
    /// Results in the order they were reported.
    pub fn rows(&self) -> &[(String, Duration)] {
        &self.rows
    }

    /// The most recent result reported under `label`.
    pub fn mean(&self, label: &str) -> Option<Duration> {
        self.rows.iter()
            .rev()
            .find(|(l, _)| l == label)
            .map(|&(_, mean)| mean)
    }
}

impl MetricsSink for Report {
    fn report(&mut self, label: &str, mean: Duration) {
        self.rows.push((label.to_owned(), mean));
    }
}

const LABEL_HEADER: &str = "label";
const MEAN_HEADER: &str = "mean time (ms/run)";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self.rows.iter()
            .map(|(label, _)| label.len())
            .chain(Some(LABEL_HEADER.len()))
            .max()
            .unwrap_or(0);

        writeln!(f, "{:<width$}  {}", LABEL_HEADER, MEAN_HEADER, width = width)?;
        for (label, mean) in &self.rows {
            writeln!(f, "{:<width$}  {:.6}", label, millis(*mean), width = width)?;
        }

        Ok(())
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

/// Runs benchmarks against a [`Clock`].
#[derive(Clone, Debug, Default)]
pub struct Runner<C = MonotonicClock> {
    clock: C,
}

impl Runner {
    pub fn new() -> Self {
        Runner::default()
    }
}

impl<C: Clock> Runner<C> {
    pub fn with_clock(clock: C) -> Self {
        Runner { clock }
    }

    /// Runs `repetitions` trials of `prepare` followed by a timed call to `measured`, then reports
    /// the mean duration of `measured` to `sink` and returns it.
    ///
    /// If either step fails, the run stops, nothing is reported, and the error is returned.
    pub fn run<I, O, E, P, M, S>(&self,
                                 label: &str,
                                 mut prepare: P,
                                 mut measured: M,
                                 repetitions: NonZeroUsize,
                                 sink: &mut S) -> Result<Duration, E>
        where P: FnMut() -> Result<I, E>,
              M: FnMut(I) -> Result<O, E>,
              S: MetricsSink + ?Sized,
    {
        let n = repetitions.get();
        let mut total = Duration::default();

        for trial in 0..n {
            let input = prepare()?;

            let start = self.clock.now();
            let output = measured(input);
            let end = self.clock.now();

            match output {
                Ok(output) => drop(black_box(output)),
                Err(e) => {
                    tracing::debug!(label, trial, "measured operation failed, aborting run");
                    return Err(e);
                }
            }

            total += end.checked_sub(start).unwrap_or_default();
        }

        let mean = Duration::from_nanos((total.as_nanos() / n as u128) as u64);
        tracing::debug!(label, repetitions = n, mean_ms = millis(mean), "benchmark finished");

        sink.report(label, mean);
        Ok(mean)
    }
}

/// Runs a benchmark with the default [`MonotonicClock`]. See [`Runner::run`].
pub fn run<I, O, E, P, M, S>(label: &str,
                             prepare: P,
                             measured: M,
                             repetitions: NonZeroUsize,
                             sink: &mut S) -> Result<Duration, E>
    where P: FnMut() -> Result<I, E>,
          M: FnMut(I) -> Result<O, E>,
          S: MetricsSink + ?Sized,
{
    Runner::new().run(label, prepare, measured, repetitions, sink)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::convert::Infallible;
    use std::rc::Rc;

    use super::*;

    /// A clock which only moves when told to.
    #[derive(Clone, Default)]
    struct ManualClock(Rc<Cell<Duration>>);

    impl ManualClock {
        fn advance(&self, d: Duration) {
            self.0.set(self.0.get() + d);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.0.get()
        }
    }

    fn reps(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn constant_duration() {
        let clock = ManualClock::default();
        let runner = Runner::with_clock(clock.clone());
        let d = Duration::from_micros(1250);

        let events = RefCell::new(Vec::new());
        let mut report = Report::default();

        let mean = runner.run(
            "constant",
            || {
                events.borrow_mut().push("prepare");
                // Time spent preparing is not measured.
                clock.advance(Duration::from_secs(1));
                Ok::<_, Infallible>(())
            },
            |()| {
                events.borrow_mut().push("measure");
                clock.advance(d);
                Ok(())
            },
            reps(5),
            &mut report,
        ).unwrap();

        assert_eq!(mean, d);
        assert_eq!(report.rows(), &[("constant".to_owned(), d)]);

        let expected: Vec<_> = ["prepare", "measure"].iter().cycle().take(10).cloned().collect();
        assert_eq!(*events.borrow(), expected);
    }

    #[test]
    fn arithmetic_mean() {
        let clock = ManualClock::default();
        let runner = Runner::with_clock(clock.clone());
        let mut report = Report::default();

        let mut next = 0;
        let mean = runner.run(
            "varying",
            || {
                next += 1;
                Ok::<_, Infallible>(Duration::from_millis(next))
            },
            |d| {
                clock.advance(d);
                Ok(())
            },
            reps(3),
            &mut report,
        ).unwrap();

        assert_eq!(mean, Duration::from_millis(2));
        assert_eq!(report.mean("varying"), Some(Duration::from_millis(2)));
    }

    #[test]
    fn failure_aborts_run() {
        let prepared = Cell::new(0);
        let measured = Cell::new(0);
        let mut report = Report::default();

        let result = run(
            "failing",
            || {
                prepared.set(prepared.get() + 1);
                Ok(prepared.get())
            },
            |trial| {
                measured.set(measured.get() + 1);
                if trial == 3 { Err("broken") } else { Ok(()) }
            },
            reps(10),
            &mut report,
        );

        assert_eq!(result, Err("broken"));
        assert_eq!(prepared.get(), 3);
        assert_eq!(measured.get(), 3);
        assert!(report.rows().is_empty());
    }

    #[test]
    fn prepare_failure_aborts_run() {
        let mut report = Report::default();
        let result = run("bad input", || Err::<(), _>("no input"), |()| Ok(()), reps(2), &mut report);

        assert_eq!(result, Err("no input"));
        assert!(report.rows().is_empty());
    }

    #[test]
    fn monotonic_clock() {
        let d = Duration::from_millis(2);
        let mut report = Report::default();

        let mean = run(
            "sleep",
            || Ok::<_, Infallible>(()),
            |()| {
                std::thread::sleep(d);
                Ok(())
            },
            reps(3),
            &mut report,
        ).unwrap();

        assert!(mean >= d, "{:?}", mean);
        assert!(mean < Duration::from_secs(1), "{:?}", mean);
    }

    #[test]
    fn report_table() {
        let mut report = Report::default();
        report.report("cbc-bench encrypt 1KB", Duration::from_micros(1500));
        report.report("x", Duration::from_nanos(250));

        let table = report.to_string();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines, [
            "label                  mean time (ms/run)",
            "cbc-bench encrypt 1KB  1.500000",
            "x                      0.000250",
        ]);
    }

    #[test]
    fn pair_sink() {
        let mut a = Report::default();
        let mut b = Report::default();

        (&mut a, &mut b).report("both", Duration::from_secs(1));
        assert_eq!(a.rows().len(), 1);
        assert_eq!(b.mean("both"), Some(Duration::from_secs(1)));
    }
}
