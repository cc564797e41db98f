//! Tests for offset addressing
//!
//! These tests verify:
//! - Offset decomposition into (item, slot, inner)
//! - Reassembly of the original offset
//! - Quantum-boundary clamping

use sculldev::storage::{clamp_to_quantum, locate, Position};
use sculldev::Geometry;

// =============================================================================
// Helper Functions
// =============================================================================

fn geometry(quantum: usize, qset: usize) -> Geometry {
    Geometry::new(quantum, qset).unwrap()
}

fn reassemble(p: &Position, g: &Geometry) -> u64 {
    p.item * g.item_size() as u64 + (p.slot * g.quantum + p.inner) as u64
}

// =============================================================================
// Decomposition Tests
// =============================================================================

#[test]
fn test_locate_default_geometry() {
    let g = Geometry::default();

    assert_eq!(locate(0, &g), Position { item: 0, slot: 0, inner: 0 });
    assert_eq!(locate(3999, &g), Position { item: 0, slot: 0, inner: 3999 });
    assert_eq!(locate(4000, &g), Position { item: 0, slot: 1, inner: 0 });
    assert_eq!(locate(4_000_000, &g), Position { item: 1, slot: 0, inner: 0 });
    assert_eq!(locate(4_004_001, &g), Position { item: 1, slot: 1, inner: 1 });
}

#[test]
fn test_locate_reassembles_offsets() {
    let g = geometry(7, 3);

    for pos in 0..500u64 {
        let p = locate(pos, &g);
        assert!(p.slot < g.qset);
        assert!(p.inner < g.quantum);
        assert_eq!(reassemble(&p, &g), pos);
    }
}

#[test]
fn test_locate_large_offset() {
    let g = geometry(4, 2);
    let p = locate(u64::MAX, &g);

    assert_eq!(reassemble(&p, &g), u64::MAX);
}

#[test]
fn test_single_byte_quantum() {
    let g = geometry(1, 1);

    assert_eq!(locate(5, &g), Position { item: 5, slot: 0, inner: 0 });
}

// =============================================================================
// Clamp Tests
// =============================================================================

#[test]
fn test_clamp_never_crosses_quantum() {
    let g = geometry(4, 2);

    for pos in 0..32u64 {
        let p = locate(pos, &g);
        let n = clamp_to_quantum(&p, &g, 100);
        assert_eq!(n as u64, 4 - pos % 4);
    }
}

#[test]
fn test_clamp_keeps_short_requests() {
    let g = geometry(4, 2);
    let p = locate(1, &g);

    assert_eq!(clamp_to_quantum(&p, &g, 0), 0);
    assert_eq!(clamp_to_quantum(&p, &g, 2), 2);
    assert_eq!(clamp_to_quantum(&p, &g, 3), 3);
}
