//! Array bounds and sizing checks shared by the reader, the builder and the validator
//!
//! Pure arithmetic with overflow protection; no I/O.

/// Number of `elem_size`-byte records in a payload of `byte_len` bytes
///
/// Returns `None` when the payload is not a whole number of records or does
/// not fit in `usize`.
pub const fn element_count(byte_len: u64, elem_size: usize) -> Option<usize> {
    if elem_size == 0 || byte_len % elem_size as u64 != 0 {
        return None;
    }
    let count = byte_len / elem_size as u64;
    if count > usize::MAX as u64 {
        return None;
    }
    Some(count as usize)
}

/// Whether a payload of `byte_len` bytes stays within an allocation ceiling
pub const fn within_alloc_limit(byte_len: u64, max_alloc: usize) -> bool {
    byte_len <= max_alloc as u64
}

/// Whether `start..start + len` lies inside an array of `total` entries
pub const fn range_in_bounds(start: u32, len: usize, total: usize) -> bool {
    match (start as usize).checked_add(len) {
        Some(end) => end <= total,
        None => false,
    }
}

/// The index the next appended entry would get, if it is representable
///
/// Indices are 32-bit and `INVALID_INDEX` is reserved, so an array may grow
/// to at most `INVALID_INDEX - 1` entries.
pub const fn next_index(len: usize) -> Option<u32> {
    if len >= (crate::format::constants::INVALID_INDEX - 1) as usize {
        return None;
    }
    Some(len as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(96, 32), Some(3));
        assert_eq!(element_count(0, 20), Some(0));
        assert_eq!(element_count(7, 1), Some(7));

        // Partial records are rejected
        assert_eq!(element_count(33, 32), None);
        assert_eq!(element_count(10, 4), None);
        assert_eq!(element_count(10, 0), None);
    }

    #[test]
    fn test_alloc_limit() {
        assert!(within_alloc_limit(0, 0));
        assert!(within_alloc_limit(1024, 1024));
        assert!(!within_alloc_limit(1025, 1024));
        assert!(!within_alloc_limit(u64::MAX, usize::MAX / 2));
    }

    #[test]
    fn test_range_in_bounds() {
        assert!(range_in_bounds(0, 4, 4));
        assert!(range_in_bounds(4, 0, 4));
        assert!(!range_in_bounds(1, 4, 4));
        assert!(!range_in_bounds(u32::MAX, usize::MAX, usize::MAX));
    }

    #[test]
    fn test_next_index() {
        assert_eq!(next_index(0), Some(0));
        assert_eq!(next_index(41), Some(41));
        assert_eq!(next_index(0xFFFF_FFFD), Some(0xFFFF_FFFD));
        assert_eq!(next_index(0xFFFF_FFFE), None);
        assert_eq!(next_index(usize::MAX), None);
    }
}
