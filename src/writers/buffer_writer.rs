use std::{
    io::Write,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

/// An in-memory sink that can be handed to the factory as an additional writer.
///
/// Clones share the same buffer, so you can keep one clone to inspect what the
/// logger wrote into the other.
/// Optionally, the buffer size is limited; then the oldest lines are dropped
/// when new ones arrive.
#[derive(Clone, Default)]
pub struct BufferWriter {
    state: Arc<Mutex<State>>,
}
#[derive(Default)]
struct State {
    buffer: String,
    max_size: Option<usize>,
    last_update: Option<Instant>,
}

impl BufferWriter {
    /// Create a new instance with unlimited size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new instance that keeps at most `max_size` bytes of complete lines.
    #[must_use]
    pub fn with_max_size(max_size: usize) -> Self {
        let writer = Self::default();
        writer.lock_state().max_size = Some(max_size);
        writer
    }

    // a panicking writer thread must not make the collected lines unreadable
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns a copy of the current buffer content.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lock_state().buffer.clone()
    }

    /// Returns the current buffer content as lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock_state()
            .buffer
            .lines()
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Removes all content.
    pub fn clear(&self) {
        let mut state = self.lock_state();
        state.buffer.clear();
        state.last_update = Some(Instant::now());
    }

    /// Updates a snapshot with the current buffer content.
    ///
    /// Does nothing if the snapshot is up-to-date.
    ///
    /// Returns whether the snapshot was updated.
    pub fn update_snapshot(&self, snapshot: &mut Snapshot) -> bool {
        let state = self.lock_state();
        if snapshot.last_update == state.last_update {
            false
        } else {
            snapshot.text.clone_from(&state.buffer);
            snapshot.last_update = state.last_update;
            true
        }
    }
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut state = self.lock_state();
        state.buffer.push_str(&String::from_utf8_lossy(buf));
        if let Some(max_size) = state.max_size {
            while state.buffer.len() > max_size {
                match state.buffer.find('\n') {
                    Some(pos) => {
                        state.buffer.drain(..=pos);
                    }
                    None => state.buffer.clear(),
                }
            }
        }
        state.last_update = Some(Instant::now());
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // nothing to do
        Ok(())
    }
}

/// Allows getting the current content of the memory buffer.
#[derive(Clone, Default)]
pub struct Snapshot {
    /// The latest snapshot of the memory buffer.
    pub text: String,
    last_update: Option<Instant>,
}
impl Snapshot {
    /// Constructor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
