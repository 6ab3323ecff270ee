use std::sync::Arc;

use super::visualizer::Visualizer;
use crate::{
    config::Config,
    error::ControlError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Visualizer`].
pub struct VisualizerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl VisualizerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers (renderers, mirrors, loggers).
    ///
    /// Subscribers receive run events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the visualizer.
    ///
    /// Must be called inside a tokio runtime: subscriber workers and the bus
    /// listener are spawned here. Fails if `Config::default_size` is outside
    /// `1..=max_size`.
    pub fn build(self) -> Result<Visualizer, ControlError> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        Visualizer::new_internal(self.cfg, bus, subs)
    }
}
