//! Tests for Storage
//!
//! These tests verify:
//! - Round trips within one quantum
//! - Quantum-boundary clamping on read and write
//! - High-water size tracking
//! - Lazy chain growth and hole reads
//! - Transfer faults leaving size untouched
//! - Trim and geometry changes

use sculldev::storage::Storage;
use sculldev::transfer::{TransferSink, TransferSource};
use sculldev::{Geometry, ScullError};

// =============================================================================
// Helper Functions
// =============================================================================

fn small_storage() -> Storage {
    Storage::new(Geometry::new(4, 2).unwrap())
}

fn write(storage: &mut Storage, pos: u64, data: &[u8]) -> usize {
    let mut source: &[u8] = data;
    storage.write_from(pos, data.len(), &mut source).unwrap()
}

fn read(storage: &Storage, pos: u64, len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    storage.read_into(pos, len, &mut out).unwrap();
    out
}

/// Source that fails every transfer
struct FaultySource;

impl TransferSource for FaultySource {
    fn copy_from_caller(&mut self, _dst: &mut [u8]) -> sculldev::Result<()> {
        Err(ScullError::TransferFault("bad address".to_string()))
    }
}

/// Sink that fails every transfer
struct FaultySink;

impl TransferSink for FaultySink {
    fn copy_to_caller(&mut self, _src: &[u8]) -> sculldev::Result<()> {
        Err(ScullError::TransferFault("bad address".to_string()))
    }
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_storage_is_empty() {
    let storage = small_storage();

    assert!(storage.is_empty());
    assert_eq!(storage.size(), 0);
    assert_eq!(storage.item_count(), 0);
    assert!(read(&storage, 0, 10).is_empty());
}

#[test]
fn test_write_then_read_round_trip() {
    let mut storage = small_storage();

    assert_eq!(write(&mut storage, 1, b"abc"), 3);
    assert_eq!(read(&storage, 1, 3), b"abc");
    assert_eq!(storage.size(), 4);
}

#[test]
fn test_write_clamps_to_quantum_boundary() {
    let mut storage = small_storage();

    assert_eq!(write(&mut storage, 2, b"XXXXX"), 2);
    assert_eq!(storage.size(), 4);

    assert_eq!(write(&mut storage, 4, b"XXX"), 3);
    assert_eq!(storage.size(), 7);
}

#[test]
fn test_read_clamps_to_quantum_boundary() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"ABCD");
    write(&mut storage, 4, b"EFGH");

    assert_eq!(read(&storage, 2, 8), b"CD");
    assert_eq!(read(&storage, 4, 8), b"EFGH");
}

#[test]
fn test_read_clamps_to_size() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"AB");

    assert_eq!(read(&storage, 0, 4), b"AB");
    assert_eq!(read(&storage, 1, 4), b"B");
}

#[test]
fn test_read_at_or_past_size_returns_nothing() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"ABCD");

    assert!(read(&storage, 4, 4).is_empty());
    assert!(read(&storage, 100, 10).is_empty());
}

// =============================================================================
// Size Tests
// =============================================================================

#[test]
fn test_size_never_decreases_on_write() {
    let mut storage = small_storage();

    write(&mut storage, 12, b"zz");
    assert_eq!(storage.size(), 14);

    write(&mut storage, 0, b"a");
    assert_eq!(storage.size(), 14);
}

#[test]
fn test_overwrite_keeps_size() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"ABCD");
    write(&mut storage, 1, b"xy");

    assert_eq!(storage.size(), 4);
    assert_eq!(read(&storage, 0, 4), b"AxyD");
}

// =============================================================================
// Chain Growth / Sparse Tests
// =============================================================================

#[test]
fn test_chain_grows_to_addressed_item() {
    let mut storage = small_storage();

    write(&mut storage, 17, b"q");

    assert_eq!(storage.item_count(), 3);
    assert!(storage.node(0).is_some());
    assert!(!storage.node(0).unwrap().has_slots());
    assert!(storage.node(2).unwrap().quantum(0).is_some());
    assert!(storage.node(3).is_none());
}

#[test]
fn test_read_does_not_grow_chain() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"a");
    let items = storage.item_count();

    read(&storage, 40, 4);

    assert_eq!(storage.item_count(), items);
}

#[test]
fn test_hole_below_size_reads_short() {
    let mut storage = small_storage();
    write(&mut storage, 100, b"tail");

    assert_eq!(storage.size(), 104);
    assert!(read(&storage, 0, 4).is_empty());
    assert!(read(&storage, 50, 4).is_empty());
    assert_eq!(read(&storage, 100, 4), b"tail");
}

#[test]
fn test_unwritten_bytes_in_allocated_quantum_read_as_zero() {
    let mut storage = small_storage();
    write(&mut storage, 3, b"z");

    assert_eq!(read(&storage, 0, 4), vec![0, 0, 0, b'z']);
}

// =============================================================================
// Transfer Fault Tests
// =============================================================================

#[test]
fn test_write_fault_leaves_size_unchanged() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"ab");

    let err = storage.write_from(2, 2, &mut FaultySource).unwrap_err();

    assert!(matches!(err, ScullError::TransferFault(_)));
    assert_eq!(storage.size(), 2);
}

#[test]
fn test_read_fault_is_reported() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"ab");

    let err = storage.read_into(0, 2, &mut FaultySink).unwrap_err();

    assert!(matches!(err, ScullError::TransferFault(_)));
}

// =============================================================================
// Trim / Geometry Tests
// =============================================================================

#[test]
fn test_trim_releases_everything() {
    let mut storage = small_storage();
    write(&mut storage, 0, b"ABCD");
    write(&mut storage, 4, b"EFGH");
    write(&mut storage, 8, b"I");

    let stats = storage.trim(Geometry::default());

    assert_eq!(stats.nodes_freed, 2);
    assert_eq!(stats.quanta_freed, 3);
    assert_eq!(stats.size_before, 9);
    assert!(storage.is_empty());
    assert_eq!(storage.geometry(), Geometry::default());
    assert!(read(&storage, 0, 8).is_empty());
}

#[test]
fn test_trim_empty_storage_is_noop() {
    let mut storage = small_storage();
    let g = storage.geometry();

    let stats = storage.trim(g);

    assert_eq!(stats.nodes_freed, 0);
    assert_eq!(stats.quanta_freed, 0);
    assert!(storage.is_empty());
}

#[test]
fn test_set_geometry_requires_empty_storage() {
    let mut storage = small_storage();
    let wide = Geometry::new(16, 4).unwrap();

    storage.set_geometry(wide).unwrap();
    assert_eq!(storage.geometry(), wide);

    write(&mut storage, 0, b"x");
    let err = storage.set_geometry(Geometry::default()).unwrap_err();
    assert!(matches!(err, ScullError::Busy(_)));
    assert_eq!(storage.geometry(), wide);
}

#[test]
fn test_node_or_create_rejects_unreachable_item() {
    let mut storage = small_storage();

    let err = storage.node_or_create(u64::MAX).unwrap_err();

    assert!(matches!(err, ScullError::AllocationFailure(_)));
    assert_eq!(storage.item_count(), 0);
}

#[test]
fn test_failed_quantum_allocation_leaves_storage_unchanged() {
    let mut storage = Storage::new(Geometry::new(usize::MAX / 4, 2).unwrap());

    let mut source: &[u8] = b"x";
    let err = storage.write_from(0, 1, &mut source).unwrap_err();

    assert!(matches!(err, ScullError::AllocationFailure(_)));
    assert_eq!(storage.item_count(), 0);
    assert_eq!(storage.size(), 0);
    assert!(storage.is_empty());
    assert_eq!(source, b"x");

    storage.set_geometry(Geometry::new(4, 2).unwrap()).unwrap();
    assert_eq!(write(&mut storage, 0, b"ok"), 2);
}

#[test]
fn test_failed_quantum_allocation_keeps_existing_chain() {
    let mut storage = Storage::new(Geometry::new(usize::MAX / 4, 2).unwrap());
    storage.node_or_create(1).unwrap();

    let mut source: &[u8] = b"x";
    let far = (usize::MAX / 4 * 2) as u64 * 2;
    assert!(storage.write_from(far, 1, &mut source).is_err());

    assert_eq!(storage.item_count(), 2);
    assert_eq!(storage.size(), 0);
}
