pub mod clock;
pub mod scrubber;

pub use clock::{AdvanceMode, ClockState, PlaybackClock, PlaybackState};
pub use scrubber::{Debouncer, ScrubCommit, ScrubGesture, ScrubPreview, Scrubber};
