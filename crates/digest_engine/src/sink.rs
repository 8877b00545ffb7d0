use std::sync::mpsc;

use crate::ParserEvent;

/// Where batch and per-category outcomes are reported.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ParserEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: ParserEvent) {}
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ParserEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ParserEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ParserEvent) {
        let _ = self.tx.send(event);
    }
}
