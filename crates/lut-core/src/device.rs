//! The lookup device: table, port, response queue and delivery timer.

use tracing::{debug, trace, warn};

use crate::api::{
    AccessMode, AccessOutcome, EventScheduler, RangeChangeListener, ResponseReceiver, Tick,
};
use crate::{
    handle_request, AddrRange, ConfigError, DeliveryState, DeliveryTimer, LookupOutcome,
    LookupTable, LutConfig, LutStats, Packet, ResponsePort, ResponseQueue,
};

/// Memory-mapped lookup device.
///
/// Every access path computes its response immediately through
/// [`handle_request`]. Functional and atomic accesses hand it straight back.
/// Timing accesses park it in the response queue, and the device delivers
/// the queue head `latency` ticks later, one response at a time, waiting on
/// the requester's retry signal whenever a delivery is refused.
#[derive(Debug, Clone)]
pub struct LookupDevice {
    name: String,
    latency: Tick,
    port: ResponsePort,
    table: LookupTable,
    queue: ResponseQueue,
    timer: DeliveryTimer,
    stats: LutStats,
}

impl LookupDevice {
    /// Builds a device from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`LutConfig::build_table`].
    pub fn new(config: &LutConfig) -> Result<Self, ConfigError> {
        let table = config.build_table()?;
        debug!(
            device = %config.name,
            entries = table.len(),
            range = %config.addr_range,
            "initialized lookup table"
        );
        for key in config.unreachable_keys() {
            warn!(
                device = %config.name,
                range = %config.addr_range,
                "table key {key:#x} lies outside the device window"
            );
        }

        Ok(Self {
            name: config.name.clone(),
            latency: config.latency,
            port: ResponsePort::new(&config.name, config.addr_range),
            table,
            queue: ResponseQueue::new(),
            timer: DeliveryTimer::new(),
            stats: LutStats::new(),
        })
    }

    /// Marks the port range valid and announces it to the fabric.
    pub fn init<L>(&mut self, fabric: &mut L)
    where
        L: RangeChangeListener + ?Sized,
    {
        self.port.set_range_valid();
        self.port.send_range_change(fabric);
        debug!(device = %self.name, range = %self.port.range(), "address range announced");
    }

    /// Instance name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed per-access latency in ticks.
    #[must_use]
    pub const fn latency(&self) -> Tick {
        self.latency
    }

    /// The device's response port.
    #[must_use]
    pub const fn port(&self) -> &ResponsePort {
        &self.port
    }

    /// Ranges the port serves.
    #[must_use]
    pub fn addr_ranges(&self) -> Vec<AddrRange> {
        self.port.addr_ranges()
    }

    /// Read-only view of the table.
    #[must_use]
    pub const fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> &LutStats {
        &self.stats
    }

    /// Number of timing responses not yet delivered.
    #[must_use]
    pub fn pending_responses(&self) -> usize {
        self.queue.len()
    }

    /// Queued timing responses, head first.
    pub fn queued(&self) -> impl Iterator<Item = &Packet> {
        self.queue.iter()
    }

    /// State of the single delivery slot.
    #[must_use]
    pub const fn delivery_state(&self) -> DeliveryState {
        self.timer.state()
    }

    /// Functional access: services `pkt` in place with no timing.
    pub fn recv_functional(&mut self, pkt: &mut Packet) {
        self.service(pkt, AccessMode::Functional);
    }

    /// Atomic access: services `pkt` in place and returns the access latency.
    pub fn recv_atomic(&mut self, pkt: &mut Packet) -> Tick {
        self.service(pkt, AccessMode::Atomic);
        self.latency
    }

    /// Timing access: services `pkt` now and queues the response.
    ///
    /// Always accepts. The first response queued while no delivery is
    /// outstanding arms a delivery `latency` ticks from now; later ones wait
    /// behind it.
    pub fn recv_timing_req<S>(&mut self, mut pkt: Packet, sched: &mut S) -> bool
    where
        S: EventScheduler + ?Sized,
    {
        self.service(&mut pkt, AccessMode::Timing);
        self.queue.push(pkt);
        self.stats.observe_queue_depth(self.queue.len());

        if !self.timer.is_armed() {
            let when = self.timer.arm(sched, self.latency);
            trace!(device = %self.name, when, "delivery armed");
        }
        true
    }

    /// Single entry point dispatching on `mode`.
    pub fn access<S>(&mut self, mode: AccessMode, mut pkt: Packet, sched: &mut S) -> AccessOutcome
    where
        S: EventScheduler + ?Sized,
    {
        match mode {
            AccessMode::Functional => {
                self.recv_functional(&mut pkt);
                AccessOutcome::Functional(pkt)
            }
            AccessMode::Atomic => {
                let latency = self.recv_atomic(&mut pkt);
                AccessOutcome::Atomic {
                    packet: pkt,
                    latency,
                }
            }
            AccessMode::Timing => AccessOutcome::Timing {
                accepted: self.recv_timing_req(pkt, sched),
            },
        }
    }

    /// Scheduler callback for an armed delivery.
    ///
    /// A callback at any tick other than the armed one is ignored.
    pub fn process_delivery_event<S, R>(&mut self, sched: &mut S, requester: &mut R)
    where
        S: EventScheduler + ?Sized,
        R: ResponseReceiver + ?Sized,
    {
        let now = sched.cur_tick();
        if !self.timer.fire(now) {
            warn!(
                device = %self.name,
                now,
                armed_for = ?self.timer.scheduled_at(),
                state = ?self.timer.state(),
                "ignoring delivery callback that does not match the armed delivery"
            );
            return;
        }
        self.send_response(sched, requester);
    }

    /// Requester's signal that a refused response can be offered again.
    ///
    /// The same head is re-offered immediately. A signal with no refused
    /// delivery outstanding is ignored.
    pub fn recv_resp_retry<S, R>(&mut self, sched: &mut S, requester: &mut R)
    where
        S: EventScheduler + ?Sized,
        R: ResponseReceiver + ?Sized,
    {
        if !self.timer.retry() {
            warn!(
                device = %self.name,
                state = ?self.timer.state(),
                "ignoring retry signal with no refused delivery"
            );
            return;
        }
        self.stats.record_retry();
        self.send_response(sched, requester);
    }

    fn send_response<S, R>(&mut self, sched: &mut S, requester: &mut R)
    where
        S: EventScheduler + ?Sized,
        R: ResponseReceiver + ?Sized,
    {
        let Some(pkt) = self.queue.pop_head() else {
            panic!("{}: delivery attempted with an empty response queue", self.name);
        };
        let tag = pkt.tag();

        match requester.recv_timing_resp(pkt) {
            Ok(()) => {
                self.stats.record_delivery();
                trace!(device = %self.name, tag, tick = sched.cur_tick(), "response delivered");
                if self.queue.is_empty() {
                    self.timer.settle();
                } else {
                    self.timer.arm(sched, self.latency);
                }
            }
            Err(pkt) => {
                self.queue.restore_head(pkt);
                self.stats.record_rejection();
                self.timer.park();
                debug!(device = %self.name, tag, "response blocked, will retry");
            }
        }
    }

    fn service(&mut self, pkt: &mut Packet, mode: AccessMode) -> LookupOutcome {
        if !self.port.is_range_valid() {
            warn!(
                device = %self.name,
                %mode,
                "access at {:#x} before the address range was announced",
                pkt.addr()
            );
        }

        let outcome = handle_request(pkt, self.port.range(), &self.table);
        self.stats.record_access(mode);
        self.stats.record_lookup(outcome);

        match outcome {
            LookupOutcome::Hit { key, value } => {
                debug!(device = %self.name, %mode, "lookup: {key:#x} -> {value:#x}");
            }
            LookupOutcome::Miss { key } => {
                debug!(device = %self.name, %mode, "lookup miss for: {key:#x}");
            }
            LookupOutcome::WriteIgnored => {
                trace!(device = %self.name, %mode, "write at {:#x} ignored", pkt.addr());
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::LookupDevice;
    use crate::api::{EventScheduler, RangeChangeListener, ResponseReceiver, Tick};
    use crate::{AddrRange, ConfigError, DeliveryState, LutConfig, Packet};

    #[derive(Default)]
    struct ManualScheduler {
        now: Tick,
        scheduled: Vec<Tick>,
    }

    impl EventScheduler for ManualScheduler {
        fn cur_tick(&self) -> Tick {
            self.now
        }

        fn schedule_delivery(&mut self, when: Tick) {
            self.scheduled.push(when);
        }
    }

    #[derive(Default)]
    struct Sink {
        busy: bool,
        received: Vec<Packet>,
    }

    impl ResponseReceiver for Sink {
        fn recv_timing_resp(&mut self, pkt: Packet) -> Result<(), Packet> {
            if self.busy {
                return Err(pkt);
            }
            self.received.push(pkt);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Fabric {
        ranges: Vec<AddrRange>,
    }

    impl RangeChangeListener for Fabric {
        fn recv_range_change(&mut self, _port: &str, ranges: &[AddrRange]) {
            self.ranges.extend_from_slice(ranges);
        }
    }

    fn device(latency: Tick) -> LookupDevice {
        let mut device =
            LookupDevice::new(&LutConfig::default().with_latency(latency)).expect("valid config");
        device.init(&mut Fabric::default());
        device
    }

    fn read(offset: u64) -> Packet {
        Packet::read(LutConfig::default().addr_range.start + offset, 4).with_tag(offset)
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let config = LutConfig {
            name: String::new(),
            ..LutConfig::default()
        };
        assert_eq!(
            LookupDevice::new(&config).map(|_| ()),
            Err(ConfigError::EmptyName)
        );
    }

    #[test]
    fn init_announces_the_single_window() {
        let mut device = LookupDevice::new(&LutConfig::default()).unwrap();
        let mut fabric = Fabric::default();
        assert!(!device.port().is_range_valid());

        device.init(&mut fabric);

        assert!(device.port().is_range_valid());
        assert_eq!(fabric.ranges, vec![LutConfig::default().addr_range]);
        assert_eq!(device.addr_ranges(), fabric.ranges);
    }

    #[test]
    fn functional_read_returns_table_value() {
        let mut device = device(1);
        let mut pkt = read(6);
        device.recv_functional(&mut pkt);
        assert!(pkt.is_response());
        assert_eq!(pkt.payload(), 0xEB);
        assert_eq!(device.stats().functional_accesses, 1);
        assert_eq!(device.stats().hits, 1);
    }

    #[test]
    fn atomic_read_reports_latency() {
        let mut device = device(10);
        let mut pkt = read(9);
        assert_eq!(device.recv_atomic(&mut pkt), 10);
        assert_eq!(pkt.payload(), 0);
        assert_eq!(device.stats().misses, 1);
        assert_eq!(device.pending_responses(), 0);
    }

    #[test]
    fn timing_request_queues_and_arms_once() {
        let mut device = device(2);
        let mut sched = ManualScheduler::default();

        assert!(device.recv_timing_req(read(0), &mut sched));
        assert!(device.recv_timing_req(read(1), &mut sched));

        assert_eq!(sched.scheduled, vec![2]);
        assert_eq!(device.pending_responses(), 2);
        assert_eq!(device.delivery_state(), DeliveryState::Armed { when: 2 });
        assert_eq!(device.stats().peak_queue_depth, 2);
    }

    #[test]
    fn accepted_delivery_rearms_for_the_next_head() {
        let mut device = device(2);
        let mut sched = ManualScheduler::default();
        let mut sink = Sink::default();
        device.recv_timing_req(read(0), &mut sched);
        device.recv_timing_req(read(1), &mut sched);

        sched.now = 2;
        device.process_delivery_event(&mut sched, &mut sink);

        assert_eq!(sink.received.len(), 1);
        assert_eq!(sched.scheduled, vec![2, 4]);
        assert_eq!(device.delivery_state(), DeliveryState::Armed { when: 4 });

        sched.now = 4;
        device.process_delivery_event(&mut sched, &mut sink);
        assert_eq!(
            sink.received.iter().map(Packet::tag).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(device.delivery_state(), DeliveryState::Idle);
        assert_eq!(device.stats().responses_delivered, 2);
    }

    #[test]
    fn refused_delivery_waits_for_retry_and_keeps_head() {
        let mut device = device(1);
        let mut sched = ManualScheduler::default();
        let mut sink = Sink {
            busy: true,
            ..Sink::default()
        };
        device.recv_timing_req(read(7), &mut sched);
        device.recv_timing_req(read(6), &mut sched);

        sched.now = 1;
        device.process_delivery_event(&mut sched, &mut sink);
        assert_eq!(device.delivery_state(), DeliveryState::AwaitingRetry);
        assert_eq!(device.queued().next().map(Packet::tag), Some(7));

        device.recv_resp_retry(&mut sched, &mut sink);
        assert_eq!(device.stats().responses_rejected, 2);
        assert_eq!(sched.scheduled, vec![1]);

        sink.busy = false;
        device.recv_resp_retry(&mut sched, &mut sink);
        assert_eq!(sink.received[0].tag(), 7);
        assert_eq!(sink.received[0].payload(), 0xAA);
        assert_eq!(device.stats().retries, 2);
        assert_eq!(sched.scheduled, vec![1, 2]);
    }

    #[test]
    fn enqueue_while_awaiting_retry_does_not_rearm() {
        let mut device = device(1);
        let mut sched = ManualScheduler::default();
        let mut sink = Sink {
            busy: true,
            ..Sink::default()
        };
        device.recv_timing_req(read(0), &mut sched);
        sched.now = 1;
        device.process_delivery_event(&mut sched, &mut sink);

        device.recv_timing_req(read(1), &mut sched);

        assert_eq!(sched.scheduled, vec![1]);
        assert_eq!(device.delivery_state(), DeliveryState::AwaitingRetry);
    }

    #[test]
    fn stale_callbacks_and_spurious_retries_are_ignored() {
        let mut device = device(3);
        let mut sched = ManualScheduler::default();
        let mut sink = Sink::default();

        device.recv_resp_retry(&mut sched, &mut sink);
        device.recv_timing_req(read(0), &mut sched);
        sched.now = 1;
        device.process_delivery_event(&mut sched, &mut sink);

        assert!(sink.received.is_empty());
        assert_eq!(device.delivery_state(), DeliveryState::Armed { when: 3 });
        assert_eq!(device.stats().retries, 0);
    }

    #[test]
    fn timing_writes_are_delivered_as_acknowledgements() {
        let mut device = device(0);
        let mut sched = ManualScheduler::default();
        let mut sink = Sink::default();

        device.recv_timing_req(
            Packet::write(LutConfig::default().addr_range.start + 6, 4, 1),
            &mut sched,
        );
        device.process_delivery_event(&mut sched, &mut sink);

        assert!(sink.received[0].is_write());
        assert!(sink.received[0].is_response());
        assert_eq!(device.stats().writes_ignored, 1);
        assert_eq!(device.table().lookup(6), Some(0xEB));
    }
}
