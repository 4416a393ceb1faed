//! Growable byte buffer used for double buffering
//!
//! A single contiguous region with independent read and write cursors.
//! Invariant: `read_index <= write_index <= capacity`. The buffer never
//! shrinks; it is compacted or grown on demand by [`Buffer::ensure_writable`].
//! It has no synchronization of its own.

/// Initial capacity of a dispatcher buffer (1 MiB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Capacity below which the buffer doubles when it grows (10 MiB)
pub const BUFFER_THRESHOLD_SIZE: usize = 10 * 1024 * 1024;

/// Linear growth step once the threshold is reached (1 MiB)
pub const BUFFER_INCREMENT_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Buffer {
    data: Vec<u8>,
    read_index: usize,
    write_index: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            read_index: 0,
            write_index: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read_index == self.write_index
    }

    /// Bytes available for reading
    #[inline]
    pub fn readable_size(&self) -> usize {
        self.write_index - self.read_index
    }

    /// Bytes that fit without growing (tail space plus reclaimable head space)
    #[inline]
    pub fn writable_size(&self) -> usize {
        self.head_idle_size() + self.tail_idle_size()
    }

    #[inline]
    pub fn head_idle_size(&self) -> usize {
        self.read_index
    }

    #[inline]
    pub fn tail_idle_size(&self) -> usize {
        self.data.len() - self.write_index
    }

    /// The unread region
    #[inline]
    pub fn readable(&self) -> &[u8] {
        &self.data[self.read_index..self.write_index]
    }

    /// Append `src` at the write cursor, compacting or growing first.
    pub fn write(&mut self, src: &[u8]) {
        self.ensure_writable(src.len());
        let end = self.write_index + src.len();
        self.data[self.write_index..end].copy_from_slice(src);
        self.write_index = end;
    }

    /// Copy `dst.len()` bytes out of the buffer and advance the read cursor.
    ///
    /// Reading past the readable region is a caller bug; it asserts in debug
    /// builds and copies only what is available otherwise.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        debug_assert!(
            dst.len() <= self.readable_size(),
            "read of {} bytes exceeds readable size {}",
            dst.len(),
            self.readable_size()
        );
        let len = dst.len().min(self.readable_size());
        dst[..len].copy_from_slice(&self.data[self.read_index..self.read_index + len]);
        self.read_index += len;
        len
    }

    /// Advance the read cursor without copying.
    pub fn move_read_cursor(&mut self, len: usize) {
        debug_assert!(
            len <= self.readable_size(),
            "cannot advance read cursor by {} with only {} readable",
            len,
            self.readable_size()
        );
        self.read_index += len.min(self.readable_size());
    }

    /// Make room for `len` more bytes at the tail.
    ///
    /// Compacts when head plus tail space suffices, otherwise grows: doubling
    /// (plus `len`) below [`BUFFER_THRESHOLD_SIZE`], then linear steps of
    /// [`BUFFER_INCREMENT_SIZE`] (plus `len`).
    pub fn ensure_writable(&mut self, len: usize) {
        if len <= self.tail_idle_size() {
            return;
        }

        if len <= self.writable_size() {
            let readable = self.readable_size();
            self.data.copy_within(self.read_index..self.write_index, 0);
            self.read_index = 0;
            self.write_index = readable;
            return;
        }

        let current = self.data.len();
        let new_capacity = if current < BUFFER_THRESHOLD_SIZE {
            current * 2 + len
        } else {
            current + BUFFER_INCREMENT_SIZE + len
        };
        self.data.resize(new_capacity, 0);
    }

    /// Exchange storage and cursors with `other` in O(1).
    pub fn swap(&mut self, other: &mut Buffer) {
        std::mem::swap(self, other);
    }

    /// Zero both cursors, keeping the capacity.
    pub fn reset(&mut self) {
        self.read_index = 0;
        self.write_index = 0;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
