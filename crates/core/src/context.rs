//! Context window - the bounded, newest-retained history of a dialog.

/// Append `value` and keep only the last `max_len` elements.
///
/// A `max_len` of zero leaves the sequence empty.
pub fn append_and_truncate<T>(sequence: &mut Vec<T>, value: T, max_len: usize) {
    sequence.push(value);
    if sequence.len() > max_len {
        let excess = sequence.len() - max_len;
        sequence.drain(..excess);
    }
}
