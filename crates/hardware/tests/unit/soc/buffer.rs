//! # Byte Buffer Tests
//!
//! Verifies zero initialization and bounds checking of the backing store.

use hlscnn_core::soc::memory::buffer::ByteBuffer;

#[test]
fn test_new_buffer_is_zeroed() {
    let buffer = ByteBuffer::new(4096);
    assert_eq!(buffer.len(), 4096);
    assert!(!buffer.is_empty());
    assert!(buffer.get(0, 4096).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_write_then_get() {
    let mut buffer = ByteBuffer::new(64);
    assert_eq!(buffer.write(16, &[1, 2, 3, 4]), Some(()));
    assert_eq!(buffer.get(16, 4).unwrap(), &[1, 2, 3, 4]);
    assert_eq!(buffer.get(15, 1).unwrap(), &[0]);
}

#[test]
fn test_out_of_range_access() {
    let mut buffer = ByteBuffer::new(32);
    assert!(buffer.get(16, 17).is_none());
    assert!(buffer.get(usize::MAX, 2).is_none());
    assert!(buffer.get_mut(32, 1).is_none());
    assert_eq!(buffer.write(30, &[9, 9, 9]), None);
    // A rejected write leaves the buffer untouched.
    assert_eq!(buffer.get(30, 2).unwrap(), &[0, 0]);
    assert_eq!(buffer.get(32, 0).unwrap(), &[] as &[u8]);
}

#[test]
fn test_empty_buffer() {
    let buffer = ByteBuffer::new(0);
    assert!(buffer.is_empty());
    assert!(buffer.get(0, 1).is_none());
}
