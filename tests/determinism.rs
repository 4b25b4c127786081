//! Determinism and permutation-invariance properties (spec §8).

use permute::PermutationFamily;

#[test]
fn same_seed_builds_bit_identical_families_across_independent_constructions() {
    let a = PermutationFamily::new(1024, 16, 4, 7).unwrap();
    let b = PermutationFamily::new(1024, 16, 4, 7).unwrap();

    let columns = vec![10u32, 200, 777];
    let sig_a = a.signature(&columns).unwrap();
    let sig_b = b.signature(&columns).unwrap();
    assert_eq!(sig_a, sig_b);
}

#[test]
fn reordering_columns_leaves_signature_unchanged() {
    let family = PermutationFamily::new(1024, 16, 4, 0).unwrap();
    let forward = vec![5u32, 900, 42, 1000];
    let mut reversed = forward.clone();
    reversed.reverse();

    assert_eq!(
        family.signature(&forward).unwrap(),
        family.signature(&reversed).unwrap()
    );
}
