//! Property-based tests for rule naming and rule counts.
//!
//! These tests use proptest to verify the compiler's invariants across
//! many randomly generated machines.

use proptest::prelude::*;
use std::collections::HashSet;
use tmtracery::{
    compile, rule_name, GrammarFormat, Machine, MachineDescription, Mode, StateSymbol,
    TransitionEntry,
};

prop_compose! {
    fn arbitrary_state()(name in "[a-zA-Z0-9_<>|-]{1,6}") -> String {
        name
    }
}

prop_compose! {
    fn arbitrary_symbol()(symbol in "[a-zA-Z0-9_<>|.-]") -> char {
        symbol.chars().next().unwrap_or('0')
    }
}

prop_compose! {
    fn arbitrary_description()(
        states in prop::collection::hash_set(arbitrary_state(), 3..7),
        symbols in prop::collection::hash_set(arbitrary_symbol(), 1..5),
        seed in any::<u64>(),
    ) -> MachineDescription {
        let states: Vec<String> = states.into_iter().collect();
        let symbols: Vec<String> = symbols.into_iter().map(String::from).collect();
        let directions = [">", "<", "_"];

        let mut delta = Vec::new();
        let mut counter = seed;
        for state in &states[2..] {
            for symbol in &symbols {
                counter = counter.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let target = &states[(counter >> 33) as usize % states.len()];
                let write = &symbols[(counter >> 17) as usize % symbols.len()];
                let direction = directions[(counter >> 7) as usize % directions.len()];
                delta.push(TransitionEntry::new(state, symbol, target, write, direction));
            }
        }

        MachineDescription {
            blank_symbol: symbols[0].clone(),
            start_state: states[2].clone(),
            accept_state: states[0].clone(),
            reject_state: states[1].clone(),
            states,
            symbols,
            delta,
        }
    }
}

proptest! {
    #[test]
    fn rule_name_is_injective(
        a in (arbitrary_state(), arbitrary_symbol()),
        b in (arbitrary_state(), arbitrary_symbol()),
    ) {
        let format = GrammarFormat::default();
        let key_a = StateSymbol::new(a.0, a.1);
        let key_b = StateSymbol::new(b.0, b.1);

        let same_name = rule_name(&key_a, &format) == rule_name(&key_b, &format);
        prop_assert_eq!(same_name, key_a == key_b);
    }

    #[test]
    fn rule_name_decodes_to_its_key(state in arbitrary_state(), symbol in arbitrary_symbol()) {
        let format = GrammarFormat::default();
        let key = StateSymbol::new(state, symbol);

        let decoded = StateSymbol::from_code(&rule_name(&key, &format), format.escape_marker);
        prop_assert_eq!(decoded, Some(key));
    }

    #[test]
    fn compiled_rule_count_matches_live_pairs(description in arbitrary_description()) {
        let format = GrammarFormat::default();
        let machine = Machine::new(&description, &format, Mode::Strict).unwrap();

        let rules = compile(&machine, &format, Mode::Strict);
        prop_assert_eq!(
            rules.len(),
            (description.states.len() - 2) * description.symbols.len()
        );

        let names: HashSet<&str> = rules.iter().map(|rule| rule.name.as_str()).collect();
        prop_assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn continuation_present_iff_target_not_halting(description in arbitrary_description()) {
        let format = GrammarFormat::default();
        let machine = Machine::new(&description, &format, Mode::Strict).unwrap();
        let continuation = format!("[{}:#{}#]", format.continuation_slot, format.activation_rule);

        for rule in compile(&machine, &format, Mode::Strict) {
            let target = &machine.transition(&rule.key).unwrap().state;
            prop_assert_eq!(
                rule.body.ends_with(&continuation),
                !machine.is_halting(target)
            );
        }
    }
}
