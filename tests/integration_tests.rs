use allocvec::{AllocVec, AllocVecConf, AllocVecError, SystemAllocator};

fn conf(capacity: usize, exp_factor: f32) -> AllocVecConf {
    AllocVecConf {
        capacity,
        exp_factor,
        allocator: SystemAllocator,
    }
}

fn filled(values: &[u32]) -> AllocVec<u32> {
    let mut vec = AllocVec::new().unwrap();
    for value in values {
        vec.add(*value).unwrap();
    }
    vec
}

#[test]
fn test_new_uses_defaults() {
    let vec: AllocVec<u32> = AllocVec::new().unwrap();

    assert_eq!(vec.len(), 0);
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), 8);
    assert_eq!(vec.exp_factor(), 2.0);
}

#[test]
fn test_with_conf_valid() {
    let vec: AllocVec<u32> = AllocVec::with_conf(conf(10, 3.0)).unwrap();

    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 10);
    assert_eq!(vec.exp_factor(), 3.0);
}

#[test]
fn test_exp_factor_exactly_one_becomes_default() {
    let vec: AllocVec<u32> = AllocVec::with_conf(conf(8, 1.0)).unwrap();
    assert_eq!(vec.exp_factor(), 2.0);
}

#[test]
fn test_add_with_sufficient_capacity() {
    let mut vec: AllocVec<u32> = AllocVec::new().unwrap();

    vec.add(1).unwrap();

    assert_eq!(vec.len(), 1);
    assert_eq!(vec.capacity(), 8);
    assert_eq!(vec.get_at(0), Ok(&1));
}

#[test]
fn test_add_three_from_capacity_one() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(1, 2.0)).unwrap();

    vec.add(1).unwrap();
    assert_eq!(vec.capacity(), 1);
    vec.add(2).unwrap();
    assert_eq!(vec.capacity(), 2);
    vec.add(3).unwrap();
    assert_eq!(vec.capacity(), 4);

    assert_eq!(vec.len(), 3);
    assert_eq!(vec.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_growth_rounds_fractional_capacity_up() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(3, 1.5)).unwrap();

    for i in 0..4 {
        vec.add(i).unwrap();
    }
    assert_eq!(vec.capacity(), 5); // ceil(3 * 1.5)

    for i in 4..6 {
        vec.add(i).unwrap();
    }
    assert_eq!(vec.capacity(), 8); // ceil(5 * 1.5)
    assert_eq!(vec.as_slice(), &[0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_growth_with_whole_product_is_not_rounded_up() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(4, 1.5)).unwrap();

    for i in 0..5 {
        vec.add(i).unwrap();
    }
    assert_eq!(vec.capacity(), 6);
}

#[test]
fn test_growth_adds_at_least_one_slot() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(1, 1.1)).unwrap();

    vec.add(1).unwrap();
    vec.add(2).unwrap();
    assert_eq!(vec.capacity(), 2);
    vec.add(3).unwrap();
    assert_eq!(vec.capacity(), 3); // ceil(2 * 1.1)
}

#[test]
fn test_capacity_grows_only_when_full() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(4, 2.0)).unwrap();

    for i in 0..4 {
        vec.add(i).unwrap();
        assert_eq!(vec.capacity(), 4);
    }
    vec.add(4).unwrap();
    assert_eq!(vec.capacity(), 8);

    vec.remove_at(0).unwrap();
    vec.add_at(0, 0).unwrap();
    assert_eq!(vec.capacity(), 8);
}

#[test]
fn test_size_never_exceeds_capacity() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(1, 1.5)).unwrap();

    for i in 0..50 {
        if i % 3 == 0 {
            vec.add_at(0, i).unwrap();
        } else {
            vec.add(i).unwrap();
        }
        assert!(vec.len() <= vec.capacity());
    }
    for _ in 0..20 {
        vec.remove_at(vec.len() / 2).unwrap();
        assert!(vec.len() <= vec.capacity());
    }
}

#[test]
fn test_add_at_positions() {
    let mut vec: AllocVec<u32> = AllocVec::new().unwrap();

    vec.add_at(0, 1).unwrap();
    vec.add_at(1, 2).unwrap();
    vec.add_at(1, 3).unwrap();
    vec.add_at(0, 4).unwrap();

    assert_eq!(vec.as_slice(), &[4, 1, 3, 2]);
}

#[test]
fn test_add_at_then_get_at_returns_inserted() {
    let mut vec = filled(&[10, 20, 30, 40]);

    for index in 0..=vec.len() {
        let mut probe = vec.copy_shallow().unwrap();
        let before = probe.len();
        probe.add_at(index, 99).unwrap();
        assert_eq!(probe.get_at(index), Ok(&99));
        assert_eq!(probe.len(), before + 1);
    }

    vec.add_at(4, 50).unwrap();
    assert_eq!(vec.get_last(), Ok(&50));
}

#[test]
fn test_add_at_out_of_range() {
    let mut vec: AllocVec<u32> = AllocVec::new().unwrap();

    assert_eq!(vec.add_at(1, 1), Err(AllocVecError::OutOfRange));
    vec.add_at(0, 1).unwrap();
    assert_eq!(vec.add_at(2, 2), Err(AllocVecError::OutOfRange));
    assert_eq!(vec.add_at(usize::MAX, 2), Err(AllocVecError::OutOfRange));
    assert_eq!(vec.len(), 1);
}

#[test]
fn test_add_at_grows_full_buffer() {
    let mut vec: AllocVec<u32> = AllocVec::with_conf(conf(2, 2.0)).unwrap();
    vec.add(1).unwrap();
    vec.add(3).unwrap();

    vec.add_at(1, 2).unwrap();

    assert_eq!(vec.capacity(), 4);
    assert_eq!(vec.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_remove_by_value() {
    let mut vec = filled(&[1, 2, 3]);

    assert_eq!(vec.remove(&2), Ok(2));
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.get_at(1), Ok(&3));
}

#[test]
fn test_remove_first_of_duplicates() {
    let mut vec = filled(&[7, 1, 7, 2]);

    vec.remove(&7).unwrap();

    assert_eq!(vec.as_slice(), &[1, 7, 2]);
}

#[test]
fn test_remove_from_empty() {
    let mut vec: AllocVec<u32> = AllocVec::new().unwrap();
    assert_eq!(vec.remove(&42), Err(AllocVecError::ValueNotFound));
}

#[test]
fn test_remove_by_reference_identity() {
    let first = 5;
    let second = 5;
    let mut vec: AllocVec<*const i32> = AllocVec::new().unwrap();
    vec.add(&first as *const i32).unwrap();
    vec.add(&second as *const i32).unwrap();

    // Raw pointer handles compare by address, not by pointee
    assert_eq!(vec.remove(&(&second as *const i32)), Ok(&second as *const i32));
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.get_at(0), Ok(&(&first as *const i32)));
}

#[test]
fn test_remove_at_shifts_left() {
    let mut vec = filled(&[0, 1, 2, 3, 4]);

    for index in [0, 2, 1] {
        let next = *vec.get_at(index + 1).unwrap();
        vec.remove_at(index).unwrap();
        assert_eq!(vec.get_at(index), Ok(&next));
    }
    assert_eq!(vec.as_slice(), &[1, 4]);
}

#[test]
fn test_remove_at_out_of_range() {
    let mut vec = filled(&[1, 2, 3]);

    assert_eq!(vec.remove_at(3), Err(AllocVecError::OutOfRange));
    assert_eq!(vec.remove_at(5), Err(AllocVecError::OutOfRange));
    assert_eq!(vec.len(), 3);

    let mut empty: AllocVec<u32> = AllocVec::new().unwrap();
    assert_eq!(empty.remove_at(0), Err(AllocVecError::OutOfRange));
}

#[test]
fn test_remove_at_last_index() {
    let mut vec = filled(&[1, 2, 3]);

    assert_eq!(vec.remove_at(2), Ok(3));
    assert_eq!(vec.as_slice(), &[1, 2]);
}

#[test]
fn test_remove_last() {
    let mut vec = filled(&[1, 2]);

    assert_eq!(vec.remove_last(), Ok(2));
    assert_eq!(vec.remove_last(), Ok(1));
    assert_eq!(vec.remove_last(), Err(AllocVecError::ValueNotFound));
}

#[test]
fn test_remove_all_keeps_capacity() {
    let mut vec = filled(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    let capacity = vec.capacity();

    vec.remove_all();

    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), capacity);
    vec.add(10).unwrap();
    assert_eq!(vec.as_slice(), &[10]);
}

#[test]
fn test_replace_at() {
    let mut vec = filled(&[1, 2, 3]);

    assert_eq!(vec.replace_at(1, 4), Ok(2));
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.get_at(1), Ok(&4));
    assert_eq!(vec.replace_at(3, 5), Err(AllocVecError::OutOfRange));
}

#[test]
fn test_swap_at() {
    let mut vec = filled(&[1, 2, 3]);

    vec.swap_at(0, 2).unwrap();
    assert_eq!(vec.as_slice(), &[3, 2, 1]);

    vec.swap_at(1, 1).unwrap();
    assert_eq!(vec.as_slice(), &[3, 2, 1]);

    assert_eq!(vec.swap_at(3, 0), Err(AllocVecError::OutOfRange));
    assert_eq!(vec.swap_at(0, 3), Err(AllocVecError::OutOfRange));
    assert_eq!(vec.as_slice(), &[3, 2, 1]);
}

#[test]
fn test_get_at_bounds() {
    let vec = filled(&[0, 1, 2, 3, 4]);

    assert_eq!(vec.get_at(0), Ok(&0));
    assert_eq!(vec.get_at(4), Ok(&4));
    assert_eq!(vec.get_at(5), Err(AllocVecError::OutOfRange));

    let empty: AllocVec<u32> = AllocVec::new().unwrap();
    assert_eq!(empty.get_at(0), Err(AllocVecError::OutOfRange));
}

#[test]
fn test_get_last() {
    let vec = filled(&[1, 2, 3]);
    assert_eq!(vec.get_last(), Ok(&3));

    let empty: AllocVec<u32> = AllocVec::new().unwrap();
    assert_eq!(empty.get_last(), Err(AllocVecError::ValueNotFound));
}

#[test]
fn test_trim_capacity() {
    let mut vec: AllocVec<u32> = AllocVec::new().unwrap();
    for i in 0..20 {
        vec.add(i).unwrap();
    }
    for _ in 0..10 {
        vec.remove_at(0).unwrap();
    }
    assert!(vec.capacity() > 10);

    vec.trim_capacity().unwrap();

    assert_eq!(vec.capacity(), 10);
    assert_eq!(vec.as_slice(), &[10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
}

#[test]
fn test_trim_capacity_empty_keeps_one_slot() {
    let mut vec: AllocVec<u32> = AllocVec::new().unwrap();

    vec.trim_capacity().unwrap();
    assert_eq!(vec.capacity(), 1);

    vec.add(1).unwrap();
    vec.add(2).unwrap();
    assert_eq!(vec.as_slice(), &[1, 2]);
}

#[test]
fn test_trim_capacity_when_already_tight() {
    let mut vec = filled(&[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(vec.capacity(), 8);

    vec.trim_capacity().unwrap();
    assert_eq!(vec.capacity(), 8);
}

#[test]
fn test_subarray() {
    let vec = filled(&[0, 1, 2, 3, 4]);

    let sub = vec.subarray(1, 3).unwrap();
    assert_eq!(sub.as_slice(), &[1, 2, 3]);
    assert_eq!(sub.exp_factor(), vec.exp_factor());

    let single = vec.subarray(4, 4).unwrap();
    assert_eq!(single.as_slice(), &[4]);
}

#[test]
fn test_subarray_is_a_copy() {
    let mut vec = filled(&[0, 1, 2]);
    let sub = vec.subarray(0, 1).unwrap();

    vec.replace_at(0, 100).unwrap();

    assert_eq!(sub.as_slice(), &[0, 1]);
}

#[test]
fn test_subarray_invalid_range() {
    let vec = filled(&[0, 1, 2, 3, 4]);

    assert_eq!(
        vec.subarray(4, 6).unwrap_err(),
        AllocVecError::InvalidRange {
            begin: 4,
            end: 6,
            size: 5
        }
    );
    assert!(matches!(
        vec.subarray(6, 7),
        Err(AllocVecError::InvalidRange { .. })
    ));
    assert!(matches!(
        vec.subarray(3, 1),
        Err(AllocVecError::InvalidRange { .. })
    ));

    let empty: AllocVec<u32> = AllocVec::new().unwrap();
    assert!(matches!(
        empty.subarray(0, 0),
        Err(AllocVecError::InvalidRange { .. })
    ));
}

#[test]
fn test_copy_shallow() {
    let vec = filled(&[1, 2, 3]);

    let copy = vec.copy_shallow().unwrap();

    assert_eq!(copy.as_slice(), vec.as_slice());
    assert_eq!(copy.capacity(), vec.capacity());
}

#[test]
fn test_copy_shallow_shares_pointees() {
    let data = [1, 2, 3];
    let mut vec: AllocVec<&i32> = AllocVec::new().unwrap();
    for value in &data {
        vec.add(value).unwrap();
    }

    let copy = vec.copy_shallow().unwrap();

    for (original, copied) in vec.iter().zip(copy.iter()) {
        assert!(core::ptr::eq(*original, *copied));
    }
}

#[test]
fn test_copy_deep_distinct_handles() {
    let mut vec: AllocVec<Box<i32>> = AllocVec::new().unwrap();
    for i in 0..5 {
        vec.add(Box::new(i)).unwrap();
    }

    let mut deep = vec.copy_deep(|b| Some(Box::new(**b))).unwrap();

    assert_eq!(deep.len(), 5);
    for (original, copied) in vec.iter().zip(deep.iter()) {
        assert_eq!(**original, **copied);
        assert!(!core::ptr::eq(&**original, &**copied));
    }

    deep.map(|b| **b += 100);
    assert_eq!(**vec.get_at(0).unwrap(), 0);
    assert_eq!(**deep.get_at(0).unwrap(), 100);
}

#[test]
fn test_contains_counts() {
    let vec = filled(&[1, 2, 1, 3, 2]);

    assert_eq!(vec.contains(&1), 2);
    assert_eq!(vec.contains(&2), 2);
    assert_eq!(vec.contains(&3), 1);
    assert_eq!(vec.contains(&4), 0);
}

#[derive(Debug, Clone)]
struct Person {
    name: &'static str,
    age: u32,
}

#[test]
fn test_contains_value_with_comparator() {
    let mut vec: AllocVec<Person> = AllocVec::new().unwrap();
    vec.add(Person { name: "ana", age: 30 }).unwrap();
    vec.add(Person { name: "bia", age: 25 }).unwrap();
    vec.add(Person { name: "caio", age: 30 }).unwrap();

    let by_age = |a: &Person, b: &Person| a.age.cmp(&b.age);
    let probe = Person { name: "", age: 30 };

    assert_eq!(vec.contains_value(&probe, by_age), 2);
    assert_eq!(
        vec.contains_value(&Person { name: "bia", age: 0 }, |a, b| a.name.cmp(&b.name)),
        1
    );
    assert_eq!(
        vec.contains_value(&Person { name: "", age: 99 }, by_age),
        0
    );
}

#[test]
fn test_index_of() {
    let vec = filled(&[5, 6, 7, 6]);

    assert_eq!(vec.index_of(&6), Ok(1));
    assert_eq!(vec.index_of(&7), Ok(2));
    assert_eq!(vec.index_of(&8), Err(AllocVecError::ValueNotFound));
}

#[test]
fn test_iter_forward_and_back() {
    let vec = filled(&[1, 2, 3]);

    let mut iter = vec.iter();
    assert_eq!(iter.size_hint(), (3, Some(3)));
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&3));
    assert_eq!(iter.len(), 1);
    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next(), None);

    let mut collected = Vec::new();
    for value in &vec {
        collected.push(*value);
    }
    assert_eq!(collected, vec![1, 2, 3]);
}

#[test]
fn test_elements_dropped_with_array() {
    use std::rc::Rc;

    let shared = Rc::new(7);
    {
        let mut vec: AllocVec<Rc<i32>> = AllocVec::with_conf(conf(1, 2.0)).unwrap();
        for _ in 0..10 {
            vec.add(Rc::clone(&shared)).unwrap();
        }
        vec.remove_at(3).unwrap();
        assert_eq!(Rc::strong_count(&shared), 10);
    }
    assert_eq!(Rc::strong_count(&shared), 1);
}

#[test]
fn test_debug_output() {
    let vec = filled(&[1, 2]);
    let text = format!("{vec:?}");

    assert!(text.contains("size: 2"));
    assert!(text.contains("[1, 2]"));
}
