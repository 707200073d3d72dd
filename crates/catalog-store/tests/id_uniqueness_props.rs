// Property tests for identifier generation and polymorphic counts

#![allow(clippy::unwrap_used, clippy::expect_used)]

use catalog_core::{CampingStove, Tent};
use catalog_store::SessionFactory;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_saved_products_are_counted_with_unique_ids(tents in 0usize..8, stoves in 0usize..8) {
        let factory = SessionFactory::in_memory().unwrap();
        let session = factory.open_session();

        let tx = session.begin_transaction().unwrap();
        let mut ids = HashSet::new();
        for i in 0..tents {
            let id = session.save(&mut Tent::new(format!("tent {}", i))).unwrap();
            prop_assert!(ids.insert(id), "duplicate id {}", id);
        }
        for i in 0..stoves {
            let id = session.save(&mut CampingStove::new(format!("stove {}", i))).unwrap();
            prop_assert!(ids.insert(id), "duplicate id {}", id);
        }
        tx.commit().unwrap();

        prop_assert_eq!(session.count("CampingProduct").unwrap(), (tents + stoves) as u64);
        prop_assert_eq!(session.query("Tent").unwrap().len(), tents);
        prop_assert_eq!(session.count("CampingStove").unwrap(), stoves as u64);
    }
}
