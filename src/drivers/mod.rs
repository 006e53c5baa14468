// src/drivers/mod.rs
pub mod acquisition;
pub mod channel;
pub mod error;
pub mod frame;
pub mod plot;
pub mod settings;
pub mod source;
pub use acquisition::{Acquisition, FeedOutcome};
pub use channel::{capture_channel, CapturePublisher, CaptureReceiver, Take};
pub use error::AcquisitionError;
pub use plot::{PlotModel, PlotStyle};
pub use source::{open_replay, open_serial, LineReader, LineSource, ManualSource};
