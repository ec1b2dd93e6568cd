use tracing::debug;

/// Identifies one issued request on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets for one request channel and remembers the
/// newest. A response is applied only if it carries the newest ticket.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
    in_flight: bool,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        self.in_flight = true;
        RequestTicket(self.latest)
    }

    /// Marks `ticket` as answered. Returns `false` for superseded tickets,
    /// whose responses must be dropped.
    pub fn complete(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 == self.latest {
            self.in_flight = false;
            true
        } else {
            debug!(
                "Discarding stale response #{} (latest is #{})",
                ticket.0, self.latest
            );
            false
        }
    }

    /// Orphans whatever is in flight.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
