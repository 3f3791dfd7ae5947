use crate::domain::playback::ClockState;
use crate::domain::trades::BucketKey;
use leptos::*;
use once_cell::sync::OnceCell;

/// Entries kept for the on-page debug console.
pub const LOG_HISTORY: usize = 200;

pub struct Globals {
    pub is_loading: RwSignal<bool>,
    pub load_percent: RwSignal<Option<u8>>,
    pub load_error: RwSignal<Option<String>>,
    pub clock_state: RwSignal<ClockState>,
    pub current_bucket: RwSignal<Option<BucketKey>>,
    pub active_markers: RwSignal<usize>,
    pub is_dragging: RwSignal<bool>,
    pub logs: RwSignal<Vec<String>>,
    pub logs_paused: RwSignal<bool>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        is_loading: create_rw_signal(true),
        load_percent: create_rw_signal(None),
        load_error: create_rw_signal(None),
        clock_state: create_rw_signal(ClockState::Idle),
        current_bucket: create_rw_signal(None),
        active_markers: create_rw_signal(0),
        is_dragging: create_rw_signal(false),
        logs: create_rw_signal(Vec::new()),
        logs_paused: create_rw_signal(false),
    })
}

crate::global_signals! {
    pub is_loading => is_loading: bool,
    pub load_percent => load_percent: Option<u8>,
    pub load_error => load_error: Option<String>,
    pub clock_state => clock_state: ClockState,
    pub current_bucket => current_bucket: Option<BucketKey>,
    pub active_markers => active_markers: usize,
    pub is_dragging => is_dragging: bool,
    pub logs => logs: Vec<String>,
    pub logs_paused => logs_paused: bool,
}

/// Appends a line to the debug console, dropping the oldest past `LOG_HISTORY`.
/// Ignored until the signals exist, so early logs never create them.
pub fn push_log(line: String) {
    let Some(globals) = GLOBALS.get() else {
        return;
    };
    if globals.logs_paused.get_untracked() {
        return;
    }
    globals.logs.update(|logs| {
        logs.push(line);
        let overflow = logs.len().saturating_sub(LOG_HISTORY);
        if overflow > 0 {
            logs.drain(..overflow);
        }
    });
}
