//! Behavioural checks every backing has to pass.
//!
//! Each check takes a factory producing a fresh, zeroed bit array of the
//! requested capacity.

use bitvault_common::error::ErrorKind;

use crate::{bit_array::BitArray, memory::InMemoryBitArray};

pub type Factory<'a> = &'a mut dyn FnMut(usize) -> Box<dyn BitArray>;

pub fn check_all(factory: Factory, capacity: usize) {
    check_set_get_clear(factory, capacity);
    check_out_of_range(factory, capacity);
    check_set_bit_if_unset(factory, capacity);
    check_clear_then_set_if_unset(factory, capacity);
    check_odd_even_merge(factory, capacity);
    check_highest_lowest(factory, capacity);
    check_next_set_bit(factory, capacity);
    check_capacity_bit_not_searched(factory);
    check_mismatched_merge(factory);
    check_merge_across_capacities(factory);
    check_matches_in_memory(factory, capacity);
}

pub fn check_set_get_clear(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    assert_eq!(bits.capacity(), capacity);
    assert_eq!(bits.byte_len(), capacity / 8 + 1);
    assert_eq!(bits.bit_size(), bits.byte_len());

    for i in 0..=capacity {
        assert!(!bits.get_bit(i).unwrap(), "bit {i} set in a fresh array");
        assert!(bits.set_bit(i).unwrap());
        assert!(bits.get_bit(i).unwrap());
    }
    assert_eq!(bits.count_ones().unwrap(), capacity as u64 + 1);

    for i in (0..=capacity).step_by(2) {
        bits.clear_bit(i).unwrap();
    }
    for i in 0..=capacity {
        assert_eq!(bits.get_bit(i).unwrap(), i % 2 == 1, "bit {i}");
    }

    // clearing an already clear bit is a no-op
    bits.clear_bit(0).unwrap();
    assert!(!bits.get_bit(0).unwrap());
}

pub fn check_out_of_range(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    assert!(bits.set_bit(capacity).is_ok());

    for index in [capacity + 1, capacity + 8, usize::MAX] {
        let err = bits.get_bit(index).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::IndexOutOfRange { index: i, capacity: c } if *i == index && *c == capacity),
            "{err}"
        );
        assert!(bits.set_bit(index).unwrap_err().is_out_of_range());
        assert!(bits.clear_bit(index).unwrap_err().is_out_of_range());
        assert!(bits.set_bit_if_unset(index).unwrap_err().is_out_of_range());
    }
    assert!(bits.get_bit(capacity).unwrap());
    assert_eq!(bits.highest_set_bit().unwrap(), Some(capacity));
}

pub fn check_set_bit_if_unset(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    let index = capacity / 3;
    assert!(bits.set_bit_if_unset(index).unwrap());
    assert!(!bits.set_bit_if_unset(index).unwrap());
    assert!(bits.get_bit(index).unwrap());
    assert_eq!(bits.count_ones().unwrap(), 1);
}

pub fn check_clear_then_set_if_unset(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    let mut rng = fastrand::Rng::with_seed(capacity as u64);
    for _ in 0..capacity / 4 {
        bits.set_bit(rng.usize(0..=capacity)).unwrap();
    }

    bits.clear().unwrap();
    assert_eq!(bits.count_ones().unwrap(), 0);
    assert!(bits.to_byte_array().unwrap().iter().all(|&b| b == 0));

    for i in 0..=capacity {
        assert!(bits.set_bit_if_unset(i).unwrap(), "bit {i}");
    }
    for i in 0..=capacity {
        assert!(bits.get_bit(i).unwrap());
    }
}

pub fn check_odd_even_merge(factory: Factory, capacity: usize) {
    let mut odd = factory(capacity);
    let mut even = factory(capacity);
    for i in 0..=capacity {
        if i % 2 == 1 {
            odd.set_bit(i).unwrap();
        } else {
            even.set_bit(i).unwrap();
        }
    }

    let mut union = factory(capacity);
    union.or(odd.as_ref()).unwrap();
    union.or(even.as_ref()).unwrap();
    for i in 0..=capacity {
        assert!(union.get_bit(i).unwrap(), "bit {i} missing from union");
    }

    odd.and(even.as_ref()).unwrap();
    for i in 0..=capacity {
        assert!(!odd.get_bit(i).unwrap(), "bit {i} left in intersection");
    }
    assert_eq!(odd.lowest_set_bit().unwrap(), None);

    // the operand is left as it was
    assert_eq!(even.count_ones().unwrap(), (capacity as u64) / 2 + 1);
}

pub fn check_highest_lowest(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    assert_eq!(bits.highest_set_bit().unwrap(), None);
    assert_eq!(bits.lowest_set_bit().unwrap(), None);

    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut max: Option<usize> = None;
    let mut min: Option<usize> = None;
    for _ in 0..200 {
        let index = rng.usize(0..=capacity);
        bits.set_bit(index).unwrap();
        max = max.max(Some(index));
        min = Some(min.map_or(index, |m| m.min(index)));
        assert_eq!(bits.highest_set_bit().unwrap(), max);
        assert_eq!(bits.lowest_set_bit().unwrap(), min);
    }

    bits.set_bit(capacity).unwrap();
    bits.set_bit(0).unwrap();
    assert_eq!(bits.highest_set_bit().unwrap(), Some(capacity));
    assert_eq!(bits.lowest_set_bit().unwrap(), Some(0));
}

pub fn check_next_set_bit(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    assert_eq!(bits.next_set_bit(0).unwrap(), None);

    let mut rng = fastrand::Rng::with_seed(17);
    let mut expected: Vec<usize> = (0..50).map(|_| rng.usize(0..capacity)).collect();
    for &i in &expected {
        bits.set_bit(i).unwrap();
    }
    bits.set_bit(capacity).unwrap();
    expected.sort_unstable();
    expected.dedup();
    assert_eq!(bits.set_bits().unwrap(), expected);

    for &i in &expected {
        assert_eq!(bits.next_set_bit(i).unwrap(), Some(i));
    }
    for window in expected.windows(2) {
        assert_eq!(bits.next_set_bit(window[0] + 1).unwrap(), Some(window[1]));
    }
    let last = *expected.last().unwrap();
    assert_eq!(bits.next_set_bit(last + 1).unwrap(), None);
    assert_eq!(bits.next_set_bit(capacity).unwrap(), None);
    assert_eq!(bits.next_set_bit(capacity + 1).unwrap(), None);
    assert_eq!(bits.next_set_bit(usize::MAX).unwrap(), None);
}

/// Bit `capacity` is addressable but forward searches stop one short of it.
pub fn check_capacity_bit_not_searched(factory: Factory) {
    let mut bits = factory(16);
    bits.set_bit(16).unwrap();
    assert!(bits.get_bit(16).unwrap());
    assert_eq!(bits.next_set_bit(0).unwrap(), None);
    assert_eq!(bits.next_set_bit(16).unwrap(), None);
    assert_eq!(bits.set_bits().unwrap(), Vec::<usize>::new());
    assert_eq!(bits.highest_set_bit().unwrap(), Some(16));

    bits.set_bit(15).unwrap();
    assert_eq!(bits.next_set_bit(0).unwrap(), Some(15));
    assert_eq!(bits.set_bits().unwrap(), vec![15]);
}

pub fn check_mismatched_merge(factory: Factory) {
    // 126 vs 127 storage bytes
    let mut bits = factory(1000);
    let mut other = factory(1010);
    bits.set_bit(10).unwrap();
    other.set_bit(11).unwrap();
    let before = bits.to_byte_array().unwrap();

    assert!(bits.or(other.as_ref()).unwrap_err().is_invalid_arg());
    assert!(bits.and(other.as_ref()).unwrap_err().is_invalid_arg());
    assert!(other.or(bits.as_ref()).unwrap_err().is_invalid_arg());
    assert_eq!(bits.to_byte_array().unwrap(), before);
}

pub fn check_merge_across_capacities(factory: Factory) {
    // Same storage size, different capacities: the whole bytes are merged.
    let mut bits = factory(1000);
    let mut other = factory(1001);
    other.set_bit(1001).unwrap();
    bits.or(other.as_ref()).unwrap();
    assert_eq!(bits.highest_set_bit().unwrap(), Some(1001));
    assert!(bits.get_bit(1001).unwrap_err().is_out_of_range());
}

/// Closing a file-backed array releases its storage; later use fails.
pub fn check_close_releases_storage(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    bits.set_bit(1).unwrap();
    bits.flush().unwrap();
    assert!(!bits.is_closed());

    bits.close().unwrap();
    assert!(bits.is_closed());
    bits.close().unwrap();

    assert_eq!(bits.capacity(), capacity);
    let err = bits.get_bit(1).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidOperation { .. }), "{err}");
    assert!(bits.set_bit(1).is_err());
    assert!(bits.clear().is_err());
    assert!(bits.to_byte_array().is_err());
    assert!(bits.highest_set_bit().is_err());

    let other = InMemoryBitArray::new(capacity).unwrap();
    assert!(bits.or(&other).is_err());
}

pub fn check_matches_in_memory(factory: Factory, capacity: usize) {
    let mut bits = factory(capacity);
    let mut reference = InMemoryBitArray::new(capacity).unwrap();
    let mut rng = fastrand::Rng::with_seed(42);

    for step in 0..1000 {
        let index = rng.usize(0..=capacity);
        match rng.u8(0..4) {
            0 => {
                bits.set_bit(index).unwrap();
                reference.set_bit(index).unwrap();
            }
            1 => {
                bits.clear_bit(index).unwrap();
                reference.clear_bit(index).unwrap();
            }
            2 => assert_eq!(
                bits.set_bit_if_unset(index).unwrap(),
                reference.set_bit_if_unset(index).unwrap(),
                "step {step}"
            ),
            _ => assert_eq!(
                bits.get_bit(index).unwrap(),
                reference.get_bit(index).unwrap(),
                "step {step}"
            ),
        }
    }

    assert_eq!(bits.to_byte_array().unwrap(), reference.as_bytes());
    assert_eq!(bits.count_ones().unwrap(), reference.count_ones().unwrap());
    assert_eq!(bits.set_bits().unwrap(), reference.set_bits().unwrap());
    assert_eq!(
        bits.highest_set_bit().unwrap(),
        reference.highest_set_bit().unwrap()
    );

    let mut mask = InMemoryBitArray::new(capacity).unwrap();
    for i in (0..=capacity).step_by(3) {
        mask.set_bit(i).unwrap();
    }
    bits.and(&mask).unwrap();
    reference.and(&mask).unwrap();
    assert_eq!(bits.to_byte_array().unwrap(), reference.as_bytes());
}
