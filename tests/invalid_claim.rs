//! Scenario 6: out-of-range claims fail with `InvalidClaim` and never mutate sequencer state.

use weir::{MultiProducerSequencer, SingleProducerSequencer, WeirError};

#[test]
fn single_producer_rejects_zero_and_oversized_claims() {
    let producer = SingleProducerSequencer::new(8);

    assert_eq!(
        producer.next(0),
        Err(WeirError::InvalidClaim {
            requested: 0,
            capacity: 8
        })
    );
    assert_eq!(
        producer.next(9),
        Err(WeirError::InvalidClaim {
            requested: 9,
            capacity: 8
        })
    );

    // no state was mutated by the rejected claims: the next successful claim still starts at 0
    assert_eq!(producer.next(1).unwrap(), 0);
}

#[test]
fn multi_producer_rejects_zero_and_oversized_claims() {
    let producer = MultiProducerSequencer::new(8);

    assert_eq!(
        producer.next(0),
        Err(WeirError::InvalidClaim {
            requested: 0,
            capacity: 8
        })
    );
    assert_eq!(
        producer.next(9),
        Err(WeirError::InvalidClaim {
            requested: 9,
            capacity: 8
        })
    );

    assert_eq!(producer.next(1).unwrap(), 0);
}
