use std::collections::VecDeque;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceKind {
    Event,
    Timer,
    Enhance,
}

/// Bounded trace buffer. Every recorded line is mirrored to `tracing`.
#[derive(Debug)]
pub(crate) struct Tracer {
    enabled: bool,
    events: bool,
    timers: bool,
    logs: VecDeque<String>,
    limit: usize,
}

impl Default for Tracer {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            limit: 10_000,
        }
    }
}

impl Tracer {
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_events(&mut self, enabled: bool) {
        self.events = enabled;
    }

    pub(crate) fn set_timers(&mut self, enabled: bool) {
        self.timers = enabled;
    }

    pub(crate) fn set_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.limit = max_entries;
        while self.logs.len() > self.limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn wants(&self, kind: TraceKind) -> bool {
        self.enabled
            && match kind {
                TraceKind::Event => self.events,
                TraceKind::Timer => self.timers,
                TraceKind::Enhance => true,
            }
    }

    pub(crate) fn record(&mut self, kind: TraceKind, line: String) {
        if !self.wants(kind) {
            return;
        }
        match kind {
            TraceKind::Event => tracing::trace!(target: "page_enhancer::event", "{line}"),
            TraceKind::Timer => tracing::trace!(target: "page_enhancer::timer", "{line}"),
            TraceKind::Enhance => tracing::debug!(target: "page_enhancer::enhance", "{line}"),
        }
        if self.logs.len() >= self.limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }
}
