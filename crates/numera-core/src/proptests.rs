//! Property-based tests for atom interning.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::AtomTable;

    proptest! {
        #[test]
        fn lookup_is_idempotent(texts in prop::collection::vec("[0-9a-z.]{1,12}", 1..40)) {
            let table = AtomTable::new();
            let first: Vec<_> = texts.iter().map(|t| table.lookup(t)).collect();
            let second: Vec<_> = texts.iter().map(|t| table.lookup(t)).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn text_round_trips(texts in prop::collection::vec("[0-9a-z.]{1,12}", 1..40)) {
            let table = AtomTable::new();
            for text in &texts {
                let handle = table.lookup(text);
                let stored = table.text(handle);
                prop_assert_eq!(stored.as_deref(), Some(text.as_str()));
            }
        }

        #[test]
        fn handles_equal_iff_text_equal(a in "[0-9]{1,6}", b in "[0-9]{1,6}") {
            let table = AtomTable::new();
            prop_assert_eq!(table.lookup(&a) == table.lookup(&b), a == b);
        }
    }
}
