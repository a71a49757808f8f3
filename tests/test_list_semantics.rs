//! List semantics - properties checked against a Vec model, plus the
//! concrete scenarios for search, slice assignment and slice construction

use mite_core::builtins::*;
use mite_core::{ErrorKind, Heap, HeapConfig, ObjRef};
use proptest::prelude::*;

/// Small arena so collections run during the longer operation sequences
fn heap() -> Heap {
    Heap::new(HeapConfig::with_arena_bytes(4096)).unwrap()
}

fn rooted_list(heap: &mut Heap, values: &[i32]) -> ObjRef {
    let list = list_new(heap).unwrap();
    heap.push_root(list);
    for &value in values {
        let item = int_new(heap, value).unwrap();
        list_append(heap, list, item).unwrap();
    }
    list
}

fn values_of(heap: &Heap, list: ObjRef) -> Vec<i32> {
    list_to_vec(heap, list)
        .unwrap()
        .into_iter()
        .map(|item| int_value(heap, item).unwrap())
        .collect()
}

fn normalize(index: isize, len: usize) -> isize {
    if index < 0 {
        index + len as isize
    } else {
        index
    }
}

fn clamp(index: isize, low: usize, len: usize) -> usize {
    normalize(index, len).clamp(low as isize, len as isize) as usize
}

#[derive(Debug, Clone)]
enum Op {
    Append(i32),
    Insert(isize, i32),
    RemoveIndex(isize),
    SetItem(isize, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i16>().prop_map(|v| Op::Append(v as i32)),
        (-40isize..40, any::<i16>()).prop_map(|(i, v)| Op::Insert(i, v as i32)),
        (-40isize..40).prop_map(Op::RemoveIndex),
        (-40isize..40, any::<i16>()).prop_map(|(i, v)| Op::SetItem(i, v as i32)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn length_tracks_reachable_elements(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut heap = heap();
        let list = rooted_list(&mut heap, &[]);
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                Op::Append(v) => {
                    let item = int_new(&mut heap, v).unwrap();
                    list_append(&mut heap, list, item).unwrap();
                    model.push(v);
                }
                Op::Insert(i, v) => {
                    let item = int_new(&mut heap, v).unwrap();
                    list_insert(&mut heap, list, i, item).unwrap();
                    model.insert(clamp(i, 0, model.len()), v);
                }
                Op::RemoveIndex(i) => {
                    let n = normalize(i, model.len());
                    let result = list_remove_index(&mut heap, list, i);
                    if n >= 0 && (n as usize) < model.len() {
                        prop_assert!(result.is_ok());
                        model.remove(n as usize);
                    } else {
                        prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::IndexError);
                    }
                }
                Op::SetItem(i, v) => {
                    let n = normalize(i, model.len());
                    let item = int_new(&mut heap, v).unwrap();
                    let result = list_set_item(&mut heap, list, i, item);
                    if n >= 0 && (n as usize) < model.len() {
                        prop_assert!(result.is_ok());
                        model[n as usize] = v;
                    } else {
                        prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::IndexError);
                    }
                }
            }

            prop_assert_eq!(list_len(&heap, list).unwrap(), model.len());
        }

        prop_assert_eq!(values_of(&heap, list), model);
    }

    #[test]
    fn negative_index_addresses_same_element(values in prop::collection::vec(any::<i16>(), 1..40)) {
        let values: Vec<i32> = values.into_iter().map(i32::from).collect();
        let mut heap = heap();
        let list = rooted_list(&mut heap, &values);
        let len = values.len() as isize;

        for i in 0..len {
            prop_assert_eq!(
                list_get_item(&heap, list, i).unwrap(),
                list_get_item(&heap, list, i - len).unwrap()
            );
        }
    }

    #[test]
    fn insert_never_fails_and_lands_clamped(
        values in prop::collection::vec(any::<i16>(), 0..30),
        index in -1000isize..1000,
    ) {
        let values: Vec<i32> = values.into_iter().map(i32::from).collect();
        let mut heap = heap();
        let list = rooted_list(&mut heap, &values);
        let marker = int_new(&mut heap, 123_456).unwrap();

        list_insert(&mut heap, list, index, marker).unwrap();
        prop_assert_eq!(list_len(&heap, list).unwrap(), values.len() + 1);

        let position = clamp(index, 0, values.len());
        prop_assert_eq!(list_get_item(&heap, list, position as isize).unwrap(), marker);
    }

    #[test]
    fn full_slice_is_equal_and_distinct(values in prop::collection::vec(any::<i16>(), 0..40)) {
        let values: Vec<i32> = values.into_iter().map(i32::from).collect();
        let mut heap = heap();
        let list = rooted_list(&mut heap, &values);

        let copy = list_get_slice(&mut heap, list, 0, values.len() as isize, 1).unwrap();
        heap.push_root(copy);
        prop_assert_ne!(copy, list);
        prop_assert_eq!(values_of(&heap, copy), values.clone());

        list_clear(&mut heap, copy).unwrap();
        prop_assert_eq!(values_of(&heap, list), values);
    }

    #[test]
    fn slice_matches_model(
        values in prop::collection::vec(any::<i16>(), 0..40),
        start in -50isize..50,
        end in -50isize..50,
        step in 1isize..6,
    ) {
        let values: Vec<i32> = values.into_iter().map(i32::from).collect();
        let mut heap = heap();
        let list = rooted_list(&mut heap, &values);

        let (lo, hi) = (clamp(start, 0, values.len()), clamp(end, 0, values.len()));
        let expected: Vec<i32> = if lo < hi {
            values[lo..hi].iter().copied().step_by(step as usize).collect()
        } else {
            Vec::new()
        };

        let slice = list_get_slice(&mut heap, list, start, end, step).unwrap();
        prop_assert_eq!(values_of(&heap, slice), expected);
    }

    #[test]
    fn replicate_repeats_in_order(
        values in prop::collection::vec(any::<i16>(), 0..20),
        count in -3isize..4,
    ) {
        let values: Vec<i32> = values.into_iter().map(i32::from).collect();
        let mut heap = heap();
        let list = rooted_list(&mut heap, &values);

        let result = list_replicate(&mut heap, list, count).unwrap();
        let expected: Vec<i32> = (0..count.max(0)).flat_map(|_| values.iter().copied()).collect();
        prop_assert_eq!(values_of(&heap, result), expected);
    }

    #[test]
    fn store_slice_matches_model(
        values in prop::collection::vec(any::<i16>(), 0..30),
        source in prop::collection::vec(any::<i16>(), 0..12),
        start in -40isize..40,
        end in -40isize..40,
    ) {
        let values: Vec<i32> = values.into_iter().map(i32::from).collect();
        let source: Vec<i32> = source.into_iter().map(i32::from).collect();
        let mut heap = heap();
        let list = rooted_list(&mut heap, &values);
        let src = rooted_list(&mut heap, &source);

        list_store_slice(&mut heap, list, start, end, src).unwrap();

        let lo = clamp(start, 0, values.len());
        let hi = clamp(end, lo, values.len());
        let mut expected = values.clone();
        expected.splice(lo..hi, source.iter().copied());
        prop_assert_eq!(values_of(&heap, list), expected);
    }
}

#[test]
fn store_slice_replacing_one_with_two() {
    let mut heap = heap();
    let list = rooted_list(&mut heap, &[10, 20, 30]);
    let source = rooted_list(&mut heap, &[99, 98]);

    list_store_slice(&mut heap, list, 1, 2, source).unwrap();
    assert_eq!(values_of(&heap, list), vec![10, 99, 98, 30]);
}

#[test]
fn index_of_present_and_absent_values() {
    let mut heap = heap();
    let list = rooted_list(&mut heap, &[10, 20, 30]);
    let twenty = int_new(&mut heap, 20).unwrap();
    let absent = int_new(&mut heap, 99).unwrap();

    assert_eq!(list_index(&heap, list, twenty).unwrap(), 1);
    assert_eq!(list_index(&heap, list, absent).unwrap_err().kind(), ErrorKind::ValueError);
}

#[test]
fn negative_step_rejected_on_both_paths() {
    let mut heap = heap();
    let minus_one = int_new(&mut heap, -1).unwrap();
    let none = heap.none();

    let err = slice_new(&mut heap, Some(none), Some(none), Some(minus_one)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueError);

    let list = rooted_list(&mut heap, &[1, 2, 3]);
    let err = list_get_slice(&mut heap, list, 3, 0, -1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueError);
}

#[test]
fn zero_step_allocates_nothing() {
    let mut heap = heap();
    let list = rooted_list(&mut heap, &[1, 2, 3]);
    let stats = heap.stats();

    let err = list_get_slice(&mut heap, list, 0, 3, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueError);
    assert_eq!(heap.stats(), stats);
}

#[test]
fn list_survives_collection_pressure() {
    let mut heap = heap();
    let list = rooted_list(&mut heap, &[]);

    // Far more garbage than the arena holds
    for round in 0..50 {
        let scratch = rooted_list(&mut heap, &[]);
        for value in 0..20 {
            let item = int_new(&mut heap, 1000 + value).unwrap();
            list_append(&mut heap, scratch, item).unwrap();
        }
        heap.pop_root();
        let keep = int_new(&mut heap, round).unwrap();
        list_append(&mut heap, list, keep).unwrap();
    }

    assert!(heap.stats().collections > 0);
    assert_eq!(values_of(&heap, list), (0..50).collect::<Vec<_>>());
}
