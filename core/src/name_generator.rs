//! Deterministic operation names for mission offers.
//!
//! Same RNG stream = same names.

use crate::rng::SubsystemRng;

pub struct OperationNames;

impl OperationNames {
    /// `Operation: <Codeword> <Action>`
    pub fn generate(rng: &mut SubsystemRng) -> String {
        let codeword = rng.pick(Self::codewords());
        let action = rng.pick(Self::actions());
        format!("Operation: {codeword} {action}")
    }

    fn codewords() -> &'static [&'static str] {
        &["Shadow", "Iron", "Nova", "Cinder", "Apex", "Zero"]
    }

    fn actions() -> &'static [&'static str] {
        &["Strike", "Rain", "Edge", "Ghost", "Dawn", "Verdict"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, RngSlot};

    #[test]
    fn names_are_deterministic() {
        let mut a = RngBank::new(12345).for_slot(RngSlot::Missions);
        let mut b = RngBank::new(12345).for_slot(RngSlot::Missions);
        assert_eq!(OperationNames::generate(&mut a), OperationNames::generate(&mut b));
    }

    #[test]
    fn names_have_prefix_and_two_words() {
        let mut rng = RngBank::new(3).for_slot(RngSlot::Missions);
        for _ in 0..50 {
            let name = OperationNames::generate(&mut rng);
            let rest = name.strip_prefix("Operation: ").expect("prefix");
            let words: Vec<&str> = rest.split_whitespace().collect();
            assert_eq!(words.len(), 2, "unexpected name: {name}");
            assert!(OperationNames::codewords().contains(&words[0]));
            assert!(OperationNames::actions().contains(&words[1]));
        }
    }
}
