use proptest::{collection::vec, prelude::*};

use super::Transaction;

impl Arbitrary for Transaction {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        vec(any::<u8>(), 1..256)
            .prop_map(Transaction::from_bytes)
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
