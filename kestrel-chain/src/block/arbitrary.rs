use std::sync::Arc;

use proptest::{collection::vec, prelude::*};

use crate::transaction::Transaction;

use super::{Block, Header};

impl Arbitrary for Header {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        vec(any::<u8>(), Header::len())
            .prop_map(|bytes| {
                let mut header = [0u8; 80];
                header.copy_from_slice(&bytes);
                Header::from_bytes_exact(header)
            })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for Block {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (any::<Header>(), vec(any::<Transaction>(), 0..8))
            .prop_map(|(header, transactions)| Block {
                header,
                transactions: transactions.into_iter().map(Arc::new).collect(),
            })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
