//! Runs a scenario against one device and collects what the requester saw.

use std::fmt;

use lut_core::{
    AccessMode, AddrRange, EventScheduler, LookupDevice, LutStats, RangeChangeListener, Tick,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::SimError;
use crate::event_queue::{EventQueue, SimEvent};
use crate::requester::Requester;
use crate::scenario::{RequestKind, Scenario};

/// One completed request as observed by the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Position of the request in the scenario.
    pub tag: u64,
    /// Offset into the device window (the lookup key).
    pub offset: u64,
    /// Read or write.
    pub kind: RequestKind,
    /// Value returned for reads, `None` for writes.
    pub payload: Option<u32>,
    /// Tick the request was issued.
    pub issued_at: Tick,
    /// Tick the response reached the requester.
    pub completed_at: Tick,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimReport {
    /// Device instance name.
    pub device: String,
    /// Window the device announced.
    pub addr_range: AddrRange,
    /// Access path used.
    pub mode: AccessMode,
    /// Device latency in ticks.
    pub latency: Tick,
    /// Completions in the order the requester received them.
    pub completions: Vec<Completion>,
    /// Device diagnostic counters at the end of the run.
    pub stats: LutStats,
    /// Simulated tick when the run ended.
    pub final_tick: Tick,
}

impl SimReport {
    /// Pretty JSON encoding of the report.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self).map_err(SimError::Encode)
    }
}

/// Probe-program style listing: one line per completion, then a summary.
impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Device {} at {} ({} mode)", self.device, self.addr_range, self.mode)?;
        for completion in &self.completions {
            match completion.payload {
                Some(value) => writeln!(
                    f,
                    "Lookup: {:#x} -> {value:#x} (binary: {:08b})",
                    completion.offset,
                    value & 0xFF
                )?,
                None => writeln!(f, "Write: {:#x} ignored", completion.offset)?,
            }
        }
        write!(
            f,
            "Completed {} accesses by tick {} ({} hits, {} misses, {} refusals)",
            self.completions.len(),
            self.final_tick,
            self.stats.hits,
            self.stats.misses,
            self.stats.responses_rejected
        )
    }
}

#[derive(Debug, Default)]
struct RangeLog {
    announced: Vec<AddrRange>,
}

impl RangeChangeListener for RangeLog {
    fn recv_range_change(&mut self, port: &str, ranges: &[AddrRange]) {
        debug!(port, ?ranges, "range change");
        self.announced.extend_from_slice(ranges);
    }
}

/// Builds the device, announces its window and runs every request.
///
/// # Errors
///
/// Returns [`SimError::InvalidRequest`] when a request is wider than the
/// device serves and [`SimError::Config`] when the device parameters are
/// invalid.
pub fn run_scenario(scenario: &Scenario) -> Result<SimReport, SimError> {
    scenario.validate()?;
    let mut device = LookupDevice::new(&scenario.device)?;
    let mut fabric = RangeLog::default();
    device.init(&mut fabric);
    let addr_range = fabric
        .announced
        .first()
        .copied()
        .unwrap_or(scenario.device.addr_range);

    info!(
        device = device.name(),
        mode = %scenario.mode,
        requests = scenario.requests.len(),
        "running scenario"
    );

    let (completions, final_tick) = match scenario.mode {
        AccessMode::Functional | AccessMode::Atomic => run_synchronous(&mut device, scenario),
        AccessMode::Timing => run_timing(&mut device, scenario),
    };

    Ok(SimReport {
        device: device.name().to_owned(),
        addr_range,
        mode: scenario.mode,
        latency: device.latency(),
        completions,
        stats: *device.stats(),
        final_tick,
    })
}

fn run_synchronous(device: &mut LookupDevice, scenario: &Scenario) -> (Vec<Completion>, Tick) {
    let base = scenario.device.addr_range.start;
    let mut now: Tick = 0;
    let mut completions = Vec::with_capacity(scenario.requests.len());

    for (tag, spec) in (0_u64..).zip(&scenario.requests) {
        let mut pkt = spec.packet(base, tag);
        let elapsed = match scenario.mode {
            AccessMode::Atomic => device.recv_atomic(&mut pkt),
            AccessMode::Functional | AccessMode::Timing => {
                device.recv_functional(&mut pkt);
                0
            }
        };
        let issued_at = now;
        now = now.saturating_add(elapsed);
        completions.push(Completion {
            tag,
            offset: spec.offset,
            kind: spec.kind,
            payload: pkt.is_read().then_some(pkt.payload()),
            issued_at,
            completed_at: now,
        });
    }
    (completions, now)
}

fn run_timing(device: &mut LookupDevice, scenario: &Scenario) -> (Vec<Completion>, Tick) {
    let base = scenario.device.addr_range.start;
    let mut events = EventQueue::new();
    let mut requester = Requester::new(scenario.backpressure);
    let mut issued_at = vec![0; scenario.requests.len()];

    let mut issue_tick: Tick = 0;
    for index in 0..scenario.requests.len() {
        events.schedule_at(issue_tick, SimEvent::Issue(index));
        issue_tick = issue_tick.saturating_add(scenario.issue_interval);
    }

    while let Some(event) = events.pop_next() {
        let now = events.cur_tick();
        requester.set_now(now);
        match event {
            SimEvent::Issue(index) => {
                issued_at[index] = now;
                let pkt = scenario.requests[index].packet(base, index as u64);
                device.recv_timing_req(pkt, &mut events);
            }
            SimEvent::Deliver => device.process_delivery_event(&mut events, &mut requester),
            SimEvent::Retry => device.recv_resp_retry(&mut events, &mut requester),
        }
        debug_assert!(
            events.pending_deliveries() <= 1,
            "more than one delivery callback outstanding"
        );
        if let Some(when) = requester.take_retry_due() {
            events.schedule_at(when, SimEvent::Retry);
        }
    }

    let final_tick = events.cur_tick();
    let completions = requester
        .into_received()
        .into_iter()
        .filter_map(|received| {
            let tag = received.packet.tag();
            let index = usize::try_from(tag).ok()?;
            let spec = scenario.requests.get(index)?;
            Some(Completion {
                tag,
                offset: spec.offset,
                kind: spec.kind,
                payload: received.packet.is_read().then_some(received.packet.payload()),
                issued_at: issued_at[index],
                completed_at: received.tick,
            })
        })
        .collect();
    (completions, final_tick)
}
