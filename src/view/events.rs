use crate::analysis::response::{AnalysisResponse, RasterDescriptor};
use crate::data::geojson::FeatureCollection;
use crate::layers::base::{LayerId, LayerRole};
use crate::Result;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};

/// Completions delivered back to the orchestrator
#[derive(Debug)]
pub enum ViewEvent {
    /// A vector fetch finished for the layer instance `layer`
    FeaturesLoaded {
        role: LayerRole,
        layer: LayerId,
        result: Result<FeatureCollection>,
    },
    AnalysisCompleted {
        result: Result<AnalysisResponse>,
    },
    /// The attach delay for a computed raster elapsed
    RasterReady {
        descriptor: RasterDescriptor,
    },
    /// The renderer could not load the legend image at `url`
    LegendFailed {
        url: String,
        message: String,
    },
}

pub type EventSender = UnboundedSender<ViewEvent>;
pub type EventReceiver = UnboundedReceiver<ViewEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    futures::channel::mpsc::unbounded()
}

/// Sends `event`, logging instead of failing once the orchestrator is gone
pub(crate) fn deliver(sender: &EventSender, event: ViewEvent) {
    if let Err(e) = sender.unbounded_send(event) {
        log::debug!("view dropped before event was delivered: {:?}", e.into_inner());
    }
}
