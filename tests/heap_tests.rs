//! Scenario tests for the public heap interface.
//!
//! These stress the interface with edge cases and longer mixed sequences:
//! ordered and adversarial insertion orders, melds in every emptiness
//! combination, decrease-key storms, structural deletes, and deep-copy
//! independence.

use std::cmp::Ordering;

use compare::Compare;
use fibonacci_heap::{FibonacciHeap, HeapError};

#[test]
fn test_empty_heap() {
    let mut heap: FibonacciHeap<i32, &str> = FibonacciHeap::new();
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.peek(), None);
    assert_eq!(heap.extract_min(), None);
    assert!(heap.min_handle().is_none());
}

#[test]
fn test_single_insert_extract() {
    let mut heap = FibonacciHeap::new();
    let h = heap.insert(5, "a");
    assert_eq!(h.key(), Ok(5));
    assert_eq!(heap.peek(), Some((&5, &"a")));
    assert_eq!(heap.extract_min(), Some((5, "a")));
    assert!(heap.is_empty());
}

#[test]
fn test_ordered_extraction() {
    let mut heap = FibonacciHeap::new();
    for (k, v) in [
        (3, 'c'),
        (1, 'a'),
        (4, 'd'),
        (1, 'b'),
        (5, 'e'),
        (9, 'f'),
        (2, 'g'),
        (6, 'h'),
    ] {
        heap.insert(k, v);
    }

    let mut keys = Vec::new();
    while let Some((k, _)) = heap.extract_min() {
        keys.push(k);
    }
    assert_eq!(keys, vec![1, 1, 2, 3, 4, 5, 6, 9]);
}

#[test]
fn test_decrease_key_triggers_cut() {
    let mut heap = FibonacciHeap::new();
    let _h10 = heap.insert(10, ());
    let _h20 = heap.insert(20, ());
    let _h30 = heap.insert(30, ());
    let h40 = heap.insert(40, ());

    // consolidation links the survivors into trees
    assert_eq!(heap.extract_min(), Some((10, ())));

    heap.decrease_key(&h40, 5).unwrap();
    assert_eq!(heap.peek(), Some((&5, &())));
    assert_eq!(heap.extract_min(), Some((5, ())));
    assert_eq!(heap.extract_min(), Some((20, ())));
    assert_eq!(heap.extract_min(), Some((30, ())));
    assert!(heap.is_empty());
}

#[test]
fn test_meld_then_extract() {
    let mut h1: FibonacciHeap<i32, ()> = [2, 4, 6].into_iter().map(|k| (k, ())).collect();
    let mut h2: FibonacciHeap<i32, ()> = [1, 3, 5].into_iter().map(|k| (k, ())).collect();

    h1.meld(&mut h2);
    assert!(h2.is_empty());
    assert_eq!(h2.len(), 0);
    assert_eq!(h1.len(), 6);

    for expected in 1..=6 {
        assert_eq!(h1.extract_min(), Some((expected, ())));
    }
    assert_eq!(h1.len(), 0);
}

#[test]
fn test_meld_empty_cases() {
    let mut a = FibonacciHeap::new();
    let mut b = FibonacciHeap::new();
    a.meld(&mut b);
    assert!(a.is_empty() && b.is_empty());

    b.insert(3, "c");
    a.meld(&mut b);
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());
    assert_eq!(a.peek(), Some((&3, &"c")));

    let mut c = FibonacciHeap::new();
    a.meld(&mut c);
    assert_eq!(a.len(), 1);
}

#[test]
fn test_meld_with_handles() {
    let mut heap1 = FibonacciHeap::new();
    let h1 = heap1.insert(100, 1);

    let mut heap2 = FibonacciHeap::new();
    let h2 = heap2.insert(200, 2);

    heap1.meld(&mut heap2);

    // handles from both sides address the surviving heap
    heap1.decrease_key(&h1, 50).unwrap();
    assert_eq!(heap1.peek(), Some((&50, &1)));

    heap1.decrease_key(&h2, 25).unwrap();
    assert_eq!(heap1.peek(), Some((&25, &2)));
}

#[test]
fn test_merge_consuming() {
    let mut heap1 = FibonacciHeap::new();
    heap1.insert(5, "a");
    heap1.insert(10, "b");

    let mut heap2 = FibonacciHeap::new();
    heap2.insert(3, "c");
    heap2.insert(7, "d");

    heap1.merge(heap2);
    assert_eq!(heap1.len(), 4);
    assert_eq!(heap1.extract_min(), Some((3, "c")));
    assert_eq!(heap1.extract_min(), Some((5, "a")));
    assert_eq!(heap1.extract_min(), Some((7, "d")));
    assert_eq!(heap1.extract_min(), Some((10, "b")));
}

#[test]
fn test_deep_copy_independence() {
    let heap: FibonacciHeap<i32, ()> = [7, 3, 9, 1].into_iter().map(|k| (k, ())).collect();
    let mut copy = heap.clone();
    let mut original = heap;

    let mut drained = Vec::new();
    while let Some((k, _)) = original.extract_min() {
        drained.push(k);
    }
    assert_eq!(drained, vec![1, 3, 7, 9]);

    // the copy is untouched by draining the original
    assert_eq!(copy.len(), 4);
    let mut drained2 = Vec::new();
    while let Some((k, _)) = copy.extract_min() {
        drained2.push(k);
    }
    assert_eq!(drained2, vec![1, 3, 7, 9]);
}

#[test]
fn test_deep_copy_after_restructuring() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();
    for i in 0..32 {
        handles.push(heap.insert(i, i));
    }
    heap.extract_min();
    heap.decrease_key(&handles[20], -5).unwrap();
    heap.delete(&handles[13]).unwrap();

    let mut copy = heap.clone();
    assert_eq!(copy.len(), heap.len());

    // mutating the copy leaves the original alone
    copy.extract_min();
    assert_eq!(copy.len() + 1, heap.len());

    let mut a = Vec::new();
    while let Some((k, _)) = heap.extract_min() {
        a.push(k);
    }
    let mut expected: Vec<i32> = (1..32).filter(|&k| k != 13 && k != 20).collect();
    expected.insert(0, -5);
    assert_eq!(a, expected);
}

#[test]
fn test_deep_copy_handles_stay_with_original() {
    let mut heap = FibonacciHeap::new();
    let h = heap.insert(10, "a");
    let mut copy = heap.clone();

    // decreasing through the original handle must not disturb the copy
    heap.decrease_key(&h, 1).unwrap();
    assert_eq!(heap.peek(), Some((&1, &"a")));
    assert_eq!(copy.peek(), Some((&10, &"a")));
    assert_eq!(copy.extract_min(), Some((10, "a")));
}

#[test]
fn test_duplicate_keys() {
    let mut heap = FibonacciHeap::new();
    heap.insert(5, "a");
    heap.insert(5, "b");
    heap.insert(5, "c");
    heap.insert(1, "d");

    assert_eq!(heap.extract_min(), Some((1, "d")));

    let mut seen = std::collections::HashSet::new();
    for _ in 0..3 {
        let (k, v) = heap.extract_min().unwrap();
        assert_eq!(k, 5);
        assert!(seen.insert(v));
    }
    assert_eq!(seen.len(), 3);
    assert!(heap.is_empty());
}

#[test]
fn test_peek_idempotent() {
    let mut heap = FibonacciHeap::new();
    heap.insert(5, "five");
    heap.insert(1, "one");

    assert_eq!(heap.peek(), Some((&1, &"one")));
    assert_eq!(heap.peek(), Some((&1, &"one")));
    assert_eq!(heap.len(), 2);
    assert_eq!(heap.extract_min(), Some((1, "one")));
}

#[test]
fn test_ascending_insertion() {
    let mut heap = FibonacciHeap::new();
    for i in 0..50 {
        heap.insert(i, ());
    }
    for i in 0..50 {
        assert_eq!(heap.extract_min(), Some((i, ())));
    }
}

#[test]
fn test_descending_insertion() {
    let mut heap = FibonacciHeap::new();
    for i in (0..50).rev() {
        heap.insert(i, ());
    }
    for i in 0..50 {
        assert_eq!(heap.extract_min(), Some((i, ())));
    }
}

#[test]
fn test_alternating_operations() {
    let mut heap = FibonacciHeap::new();

    for i in 0..10 {
        heap.insert(i * 10, ());
    }
    heap.extract_min();
    heap.extract_min();
    heap.extract_min();

    for i in 10..15 {
        heap.insert(i * 10, ());
    }
    heap.extract_min();
    heap.extract_min();

    let mut count = 0;
    while heap.extract_min().is_some() {
        count += 1;
    }
    assert_eq!(count, 10);
}

#[test]
fn test_decrease_key_new_min() {
    let mut heap = FibonacciHeap::new();
    let h1 = heap.insert(100, 1);
    let h2 = heap.insert(200, 2);
    let h3 = heap.insert(300, 3);

    heap.decrease_key(&h3, 150).unwrap();
    assert_eq!(heap.peek(), Some((&100, &1)));

    heap.decrease_key(&h2, 50).unwrap();
    assert_eq!(heap.peek(), Some((&50, &2)));

    heap.decrease_key(&h1, 25).unwrap();
    assert_eq!(heap.peek(), Some((&25, &1)));
}

#[test]
fn test_multiple_decrease_same_handle() {
    let mut heap = FibonacciHeap::new();
    let handle = heap.insert(1000, 1);

    for key in [500, 250, 100, 50, 1] {
        heap.decrease_key(&handle, key).unwrap();
        assert_eq!(heap.peek(), Some((&key, &1)));
    }
}

#[test]
fn test_decrease_to_negative() {
    let mut heap = FibonacciHeap::new();
    let h1 = heap.insert(10, 1);
    let _h2 = heap.insert(20, 2);

    heap.decrease_key(&h1, -5).unwrap();
    assert_eq!(heap.peek(), Some((&-5, &1)));
    assert_eq!(heap.extract_min(), Some((-5, 1)));
}

#[test]
fn test_all_decreased_to_same_key() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();
    for i in 0..10 {
        handles.push(heap.insert((i + 1) * 10, i));
    }

    for handle in &handles {
        heap.decrease_key(handle, 5).unwrap();
    }
    assert_eq!(heap.peek().unwrap().0, &5);

    let mut seen = std::collections::HashSet::new();
    while let Some((k, v)) = heap.extract_min() {
        assert_eq!(k, 5);
        assert!(seen.insert(v));
    }
    assert_eq!(seen.len(), 10);
}

#[test]
fn test_decrease_key_worsening_rejected() {
    let mut heap = FibonacciHeap::new();
    let h = heap.insert(10, 1);
    assert_eq!(heap.decrease_key(&h, 11), Err(HeapError::KeyNotDecreased));
    // the failed call must leave the heap unchanged
    assert_eq!(heap.peek(), Some((&10, &1)));
    assert_eq!(heap.len(), 1);
}

#[test]
fn test_delete_min_node() {
    let mut heap = FibonacciHeap::new();
    let h1 = heap.insert(1, "a");
    heap.insert(2, "b");

    assert_eq!(heap.delete(&h1), Ok((1, "a")));
    assert_eq!(heap.len(), 1);
    assert_eq!(heap.peek(), Some((&2, &"b")));
}

#[test]
fn test_delete_only_node() {
    let mut heap = FibonacciHeap::new();
    let h = heap.insert(1, "a");
    assert_eq!(heap.delete(&h), Ok((1, "a")));
    assert!(heap.is_empty());
    assert_eq!(heap.extract_min(), None);
}

#[test]
fn test_delete_all_one_by_one() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();
    for i in 0..40 {
        handles.push(heap.insert((i * 17 + 23) % 100, i));
    }
    // exercise deletes against a consolidated structure
    heap.extract_min();
    handles.retain(|h| !h.is_stale());

    for h in &handles {
        let (_, _) = heap.delete(h).unwrap();
    }
    assert!(heap.is_empty());
    assert_eq!(heap.len(), 0);
}

#[test]
fn test_delete_then_extract_rest() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();
    for i in 0..20 {
        handles.push(heap.insert(i, i));
    }
    heap.extract_min();
    heap.delete(&handles[5]).unwrap();
    heap.delete(&handles[12]).unwrap();

    let mut keys = Vec::new();
    while let Some((k, _)) = heap.extract_min() {
        keys.push(k);
    }
    let expected: Vec<i32> = (1..20).filter(|&k| k != 5 && k != 12).collect();
    assert_eq!(keys, expected);
}

#[test]
fn test_stress_operations() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();

    for i in 0..100 {
        handles.push(heap.insert(i * 2, i));
    }

    for i in (0..100).step_by(3) {
        heap.decrease_key(&handles[i], i as i32 * 2 - 1).unwrap();
    }

    for _ in 0..20 {
        heap.extract_min();
    }

    assert!(!heap.is_empty());
    assert!(heap.peek().is_some());

    let mut count = 0;
    while heap.extract_min().is_some() {
        count += 1;
    }
    assert_eq!(count, 80);
}

#[test]
fn test_very_large_sequence() {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();

    for i in 0..1000 {
        handles.push(heap.insert(i * 10, i));
    }

    for i in (0..1000).step_by(10) {
        heap.decrease_key(&handles[i], (i as i32) - 1).unwrap();
    }

    for _ in 0..100 {
        heap.extract_min();
    }

    for i in 1000..1200 {
        heap.insert(i * 10, i);
    }

    let mut last = i32::MIN;
    let mut count = 0;
    while let Some((k, _)) = heap.extract_min() {
        assert!(k >= last);
        last = k;
        count += 1;
    }
    assert_eq!(count, 1100);
}

/// Orders keys descending, turning the heap into a max-heap.
#[derive(Clone, Copy, Default)]
struct Descending;

impl Compare<i32> for Descending {
    fn compare(&self, l: &i32, r: &i32) -> Ordering {
        r.cmp(l)
    }
}

#[test]
fn test_custom_comparator() {
    let mut heap: FibonacciHeap<i32, &str, Descending> = FibonacciHeap::with_comparator(Descending);
    heap.insert(1, "low");
    heap.insert(9, "high");
    heap.insert(5, "mid");

    assert_eq!(heap.peek(), Some((&9, &"high")));
    assert_eq!(heap.extract_min(), Some((9, "high")));
    assert_eq!(heap.extract_min(), Some((5, "mid")));
    assert_eq!(heap.extract_min(), Some((1, "low")));
}

#[test]
fn test_custom_comparator_decrease_moves_up() {
    // under Descending, "decrease" means the key may only grow
    let mut heap: FibonacciHeap<i32, (), Descending> = FibonacciHeap::with_comparator(Descending);
    let h = heap.insert(5, ());
    heap.insert(8, ());

    assert_eq!(heap.decrease_key(&h, 3), Err(HeapError::KeyNotDecreased));
    heap.decrease_key(&h, 10).unwrap();
    assert_eq!(heap.peek(), Some((&10, &())));
}

#[test]
fn test_custom_comparator_deep_copy() {
    let mut heap: FibonacciHeap<i32, (), Descending> = FibonacciHeap::with_comparator(Descending);
    for k in [4, 2, 8] {
        heap.insert(k, ());
    }
    let mut copy = heap.clone();
    assert_eq!(copy.extract_min(), Some((8, ())));
    assert_eq!(copy.extract_min(), Some((4, ())));
    assert_eq!(copy.extract_min(), Some((2, ())));
    assert_eq!(heap.len(), 3);
}

#[test]
fn test_from_iter_and_extend() {
    let mut heap: FibonacciHeap<i32, char> = vec![(2, 'b'), (1, 'a')].into_iter().collect();
    assert_eq!(heap.len(), 2);

    heap.extend(vec![(0, 'z'), (3, 'c')]);
    assert_eq!(heap.len(), 4);

    let keys: Vec<i32> = std::iter::from_fn(|| heap.extract_min().map(|(k, _)| k)).collect();
    assert_eq!(keys, vec![0, 1, 2, 3]);
}
