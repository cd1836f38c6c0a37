use std::collections::TryReserveError;

use thiserror::Error;

use crate::layout::DialId;
use crate::markers::MarkerId;

#[derive(Error, Debug)]
pub enum DialError {
    #[error("Marker {id} has value {value}, expected a finite value in [0, 360)")]
    ValueOutOfRange { id: MarkerId, value: f64 },
    #[error("Malformed marker line {0:?}, expected `ID SYMBOL VALUE`")]
    MalformedMarker(String),
    #[error("Duplicate marker id {0}")]
    DuplicateMarker(MarkerId),
    #[error("Unknown dial {0}")]
    UnknownDial(DialId),
    #[error("Failed to allocate a {width}x{height} static layer")]
    LayerAllocation {
        width: usize,
        height: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Pixels error: {0}")]
    Pixels(#[from] pixels::Error),
}
