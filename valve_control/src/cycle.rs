//! External driver for a set of independent valves.
//!
//! The valves never arm timers; the runner is the timer. Each cycle calls
//! `on_timeout_tick()` on every device in insertion order. Sensor-change
//! events are forwarded through [`CycleRunner::notify_data_changed`].

use std::time::{Duration, Instant};

use tracing::{debug, trace};
use valve_common::consts::DEFAULT_TICK_PERIOD_US;

use crate::device::Controllable;
use crate::valve::Valve;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// Cycle timing statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Cycles whose body exceeded the period.
    pub overruns: u64,
    /// Device steps that reported activity, over all cycles.
    pub active_steps: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            active_steps: 0,
        }
    }

    /// Record one cycle. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: u64, active: usize) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
        self.active_steps += active as u64;
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CycleRunner ────────────────────────────────────────────────────

/// Polls a set of devices at a fixed period.
#[derive(Debug)]
pub struct CycleRunner<D: Controllable = Valve> {
    devices: Vec<D>,
    period: Duration,
    stats: CycleStats,
}

impl<D: Controllable> CycleRunner<D> {
    /// Create an empty runner ticking every `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            devices: Vec::new(),
            period,
            stats: CycleStats::new(),
        }
    }

    /// Append a device; devices are polled in insertion order.
    pub fn add(&mut self, device: D) {
        debug!(device = %device.name(), "device added to cycle");
        self.devices.push(device);
    }

    /// Call `on_timeout_tick()` on every device. Returns how many reported
    /// activity.
    pub fn tick(&mut self) -> usize {
        self.devices
            .iter_mut()
            .map(|d| usize::from(d.on_timeout_tick()))
            .sum()
    }

    /// Call `on_data_changed()` on every device. Returns how many reported
    /// activity.
    pub fn notify_data_changed(&mut self) -> usize {
        self.devices
            .iter_mut()
            .map(|d| usize::from(d.on_data_changed()))
            .sum()
    }

    /// Run `cycles` ticks paced at the configured period.
    pub fn run_cycles(&mut self, cycles: u64) -> &CycleStats {
        for _ in 0..cycles {
            let cycle_start = Instant::now();
            let active = self.tick();
            let elapsed = cycle_start.elapsed();
            let duration_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);

            self.stats.record(duration_ns, active);
            if elapsed > self.period {
                self.stats.overruns += 1;
                debug!(duration_ns, period = ?self.period, "cycle overrun");
            }
            trace!(cycle = self.stats.cycle_count, active, "cycle done");

            if let Some(remaining) = self.period.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        &self.stats
    }

    /// Statistics of all cycles run so far.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// First device named `name`.
    pub fn valve(&self, name: &str) -> Option<&D> {
        self.devices.iter().find(|d| d.name() == name)
    }

    /// Mutable lookup, e.g. to write a command.
    pub fn valve_mut(&mut self, name: &str) -> Option<&mut D> {
        self.devices.iter_mut().find(|d| d.name() == name)
    }

    /// All devices in polling order.
    pub fn devices(&self) -> &[D] {
        &self.devices
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True if no device was added.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<D: Controllable> Default for CycleRunner<D> {
    fn default() -> Self {
        Self::new(Duration::from_micros(DEFAULT_TICK_PERIOD_US))
    }
}
