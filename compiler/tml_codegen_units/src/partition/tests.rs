use super::*;
use crate::lowered::LoweredFunction;
use crate::test_helpers::{add_function, module_with};
use pretty_assertions::assert_eq;

fn units(plan: PartitionPlan) -> Vec<CodegenUnit> {
    match plan {
        PartitionPlan::Partitioned(units) => units,
        PartitionPlan::Monolithic { .. } => panic!("expected a partitioned plan"),
    }
}

#[test]
fn single_unit_is_monolithic() {
    let module = module_with("app", 5);
    let all: Vec<Fingerprint> = module.functions.iter().map(fingerprint_function).collect();
    let expected = PartitionPlan::Monolithic {
        fingerprint: combine_cgu_fingerprint(&all),
    };

    assert_eq!(partition(&module, 1), expected);
    assert_eq!(partition(&module, 0), expected);
    assert_eq!(partition(&module, 1).unit_count(), 1);
}

#[test]
fn small_modules_are_monolithic() {
    assert!(matches!(
        partition(&module_with("empty", 0), 8),
        PartitionPlan::Monolithic { .. }
    ));
    assert!(matches!(
        partition(&module_with("one", 1), 8),
        PartitionPlan::Monolithic { .. }
    ));
}

#[test]
fn more_units_than_functions() {
    let module = module_with("app", 5);
    let units = units(partition(&module, 16));

    assert_eq!(units.len(), 5);
    for (i, unit) in units.iter().enumerate() {
        assert_eq!(unit.functions, vec![i]);
        assert_eq!(unit.name, format!("app.cgu{i}"));
        assert_eq!(
            unit.function_fingerprints,
            vec![fingerprint_function(&module.functions[i])]
        );
    }
}

#[test]
fn assignment_by_name_hash() {
    let module = module_with("app", 40);
    let units = units(partition(&module, 4));

    assert!(units.len() <= 4);
    for unit in &units {
        let slot: usize = unit
            .name
            .strip_prefix("app.cgu")
            .and_then(|s| s.parse().ok())
            .unwrap_or(usize::MAX);
        for &index in &unit.functions {
            let name = module.functions[index].name.as_bytes();
            assert_eq!((fnv1a(name) % 4) as usize, slot);
        }
        assert_eq!(
            unit.fingerprint,
            combine_cgu_fingerprint(&unit.function_fingerprints)
        );
    }
}

#[test]
fn unit_fingerprint_follows_members() {
    let mut module = module_with("app", 12);
    let before = units(partition(&module, 3));

    let changed = module
        .functions
        .iter()
        .position(|f| f.name == "f7")
        .unwrap_or(0);
    module.functions[changed] = {
        let mut f: LoweredFunction = add_function("f7", 7);
        f.attributes.push("cold".to_string());
        f
    };
    let after = units(partition(&module, 3));

    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.functions, new.functions);
        let touched = old.functions.contains(&changed);
        assert_eq!(old.fingerprint != new.fingerprint, touched, "{}", old.name);
    }
}

#[allow(clippy::disallowed_types, reason = "proptest macros internally use Arc")]
mod proptest_partition {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn partition_is_deterministic_and_covers_every_function(
            count in 0usize..60,
            requested in 0usize..20,
        ) {
            let module = module_with("prop", count);
            let first = partition(&module, requested);
            prop_assert_eq!(&first, &partition(&module, requested));

            if let PartitionPlan::Partitioned(units) = first {
                let mut seen: Vec<usize> = units
                    .iter()
                    .flat_map(|u| u.functions.iter().copied())
                    .collect();
                seen.sort_unstable();
                prop_assert_eq!(seen, (0..count).collect::<Vec<_>>());
                prop_assert!(units.len() <= requested.min(count));
                for unit in &units {
                    prop_assert!(!unit.functions.is_empty());
                    prop_assert_eq!(unit.functions.len(), unit.function_fingerprints.len());
                }
                if requested >= count {
                    prop_assert!(units.iter().all(|u| u.functions.len() == 1));
                }
            } else {
                prop_assert!(requested.min(count) <= 1);
            }
        }
    }
}
