//! Property-based tests over arbitrary gate permutations
//!
//! Every permutation of 1..=64 is a valid sequence, so these drive the full
//! pipeline with shuffled orderings and random anchors.

use proptest::prelude::*;

use gate_wheel::core::types::{Gate, Line, LineAddress, LINE_COUNT, QUANTUM};
use gate_wheel::core::RawConfig;
use gate_wheel::wheel::{validate, AngleCalculator, PositionSpec, RotationSolver, Sequence};

fn permutation() -> impl Strategy<Value = Vec<u32>> {
    Just((1..=64u32).collect::<Vec<_>>()).prop_shuffle()
}

/// North spec built from a sequence index: adjacent straddle or a centre
fn north_at(sequence: &Sequence, index: usize, centered: bool) -> PositionSpec {
    if centered {
        PositionSpec::centered(sequence.gate_at(index))
    } else {
        PositionSpec::straddled(sequence.gate_at(index), sequence.gate_at(index + 1))
    }
}

fn raw_for(numbers: &[u32], north: PositionSpec) -> RawConfig {
    RawConfig {
        sequence: Some(serde_json::Value::from(numbers.to_vec())),
        cardinal_progression: Some("NWSE".into()),
        north_position: Some(north.to_string().into()),
        ..RawConfig::default()
    }
}

proptest! {
    /// Identical input always yields the identical offset
    #[test]
    fn prop_rotation_is_deterministic(numbers in permutation(), index in 0usize..64, centered: bool) {
        let sequence = Sequence::new(&numbers).unwrap();
        let north = north_at(&sequence, index, centered);
        let first = RotationSolver::solve(&sequence, &north);
        let second = RotationSolver::solve(&Sequence::new(&numbers).unwrap(), &north);
        prop_assert_eq!(first, second);
        prop_assert!(first.degrees() >= 0.0 && first.degrees() < 360.0);
    }

    /// Every angle lies in [0, 360) and the North anchor lands on 0
    #[test]
    fn prop_angles_in_range(numbers in permutation(), index in 0usize..64, centered: bool) {
        let sequence = Sequence::new(&numbers).unwrap();
        let config = validate(&raw_for(&numbers, north_at(&sequence, index, centered))).unwrap();
        prop_assert_eq!(config.layout().north, 0.0);
        if !centered {
            prop_assert_eq!(config.angle_of(sequence.gate_at(index + 1), Line::FIRST), 0.0);
        }

        for gate in Gate::all() {
            for line in Line::all() {
                let angle = config.angle_of(gate, line);
                prop_assert!((0.0..360.0).contains(&angle), "{} out of range", angle);
            }
        }
    }

    /// No gap or overlap at any gate boundary
    #[test]
    fn prop_gate_boundaries_close(numbers in permutation(), index in 0usize..64) {
        let sequence = Sequence::new(&numbers).unwrap();
        let offset = RotationSolver::solve(&sequence, &north_at(&sequence, index, false));
        let calc = AngleCalculator::new(&sequence, offset);

        for gate in sequence.iter() {
            let last = calc.angle_of(LineAddress::of(gate, Line::LAST));
            let next = calc.angle_of(LineAddress::of(sequence.successor(gate), Line::FIRST));
            prop_assert_eq!((last + QUANTUM) % 360.0, next);
        }
    }

    /// All 384 addresses map to distinct angles, one quantum apart
    #[test]
    fn prop_angles_are_injective(numbers in permutation(), index in 0usize..64, centered: bool) {
        let sequence = Sequence::new(&numbers).unwrap();
        let offset = RotationSolver::solve(&sequence, &north_at(&sequence, index, centered));
        let mut angles: Vec<f64> = AngleCalculator::new(&sequence, offset)
            .table()
            .into_iter()
            .map(|(_, angle)| angle)
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        angles.dedup();
        prop_assert_eq!(angles.len(), LINE_COUNT);
        for pair in angles.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], QUANTUM);
        }
    }

    /// Canonical form of any spec parses back to the same spec
    #[test]
    fn prop_position_spec_roundtrip(a in 1u32..=64, b in 1u32..=64, straddled: bool) {
        let spec = if straddled {
            PositionSpec::straddled(Gate::new(a).unwrap(), Gate::new(b).unwrap())
        } else {
            PositionSpec::centered(Gate::new(a).unwrap())
        };
        let text = spec.to_string();
        prop_assert_eq!(text.parse::<PositionSpec>(), Ok(spec));
        prop_assert_eq!(text.parse::<PositionSpec>().unwrap().to_string(), text);
    }

    /// Locating an address's own angle returns that address at zero distance
    #[test]
    fn prop_locate_inverts_angle_of(
        numbers in permutation(),
        index in 0usize..64,
        gate in 1u32..=64,
        line in 1u32..=6,
    ) {
        let sequence = Sequence::new(&numbers).unwrap();
        let offset = RotationSolver::solve(&sequence, &north_at(&sequence, index, true));
        let calc = AngleCalculator::new(&sequence, offset);
        let address = LineAddress::new(gate, line).unwrap();

        let located = calc.locate(calc.angle_of(address)).unwrap();
        prop_assert_eq!(located.address, address);
        prop_assert_eq!(located.distance, 0.0);
    }

    /// Re-validating the canonical form gives an equal configuration
    #[test]
    fn prop_revalidation_is_idempotent(numbers in permutation(), index in 0usize..64, centered: bool) {
        let sequence = Sequence::new(&numbers).unwrap();
        let config = validate(&raw_for(&numbers, north_at(&sequence, index, centered))).unwrap();
        prop_assert_eq!(validate(&config.to_raw()).unwrap(), config);
    }
}
