//! Random driver identities handed out on park.

use rand::prelude::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Hank", "Jack",
    "Kate",
];

const SURNAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Jackson", "White", "Martin", "Thompson", "Garcia",
    "Martinez", "Robinson", "Clark", "Rodriguez", "Lewis", "Lee", "Walker", "Hall", "Allen",
];

/// Plate in the form `LL DDD-LL`.
pub fn license_plate(rng: &mut impl Rng) -> String {
    let mut plate = String::with_capacity(9);
    push_letters(&mut plate, rng, 2);
    plate.push(' ');
    for _ in 0..3 {
        plate.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    plate.push('-');
    push_letters(&mut plate, rng, 2);
    plate
}

pub fn driver_name(rng: &mut impl Rng) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("John");
    let last = SURNAMES.choose(rng).copied().unwrap_or("Smith");
    format!("{first} {last}")
}

/// Opaque car tint, each channel uniform in [0, 1].
pub fn car_color(rng: &mut impl Rng) -> [f32; 4] {
    [
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
        rng.random_range(0.0..=1.0),
        1.0,
    ]
}

fn push_letters(out: &mut String, rng: &mut impl Rng, count: usize) {
    for _ in 0..count {
        out.push(char::from(b'A' + rng.random_range(0..26u8)));
    }
}

/// True if `plate` has the `LL DDD-LL` shape.
pub fn is_valid_plate(plate: &str) -> bool {
    let bytes = plate.as_bytes();
    bytes.len() == 9
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2] == b' '
        && bytes[3..6].iter().all(u8::is_ascii_digit)
        && bytes[6] == b'-'
        && bytes[7..].iter().all(u8::is_ascii_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn plates_match_pattern() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let plate = license_plate(&mut rng);
            assert!(is_valid_plate(&plate), "bad plate {plate:?}");
        }
    }

    #[test]
    fn plate_validator_rejects_malformed() {
        assert!(is_valid_plate("AB 123-CD"));
        assert!(!is_valid_plate("ab 123-CD"));
        assert!(!is_valid_plate("AB123-CD"));
        assert!(!is_valid_plate("AB 12X-CD"));
        assert!(!is_valid_plate("AB 123 CD"));
        assert!(!is_valid_plate(""));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(license_plate(&mut a), license_plate(&mut b));
        assert_eq!(driver_name(&mut a), driver_name(&mut b));
        assert_eq!(car_color(&mut a), car_color(&mut b));
    }

    #[test]
    fn driver_name_uses_known_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        let name = driver_name(&mut rng);
        let (first, last) = name.split_once(' ').expect("name has two parts");
        assert!(FIRST_NAMES.contains(&first));
        assert!(SURNAMES.contains(&last));
    }

    #[test]
    fn car_color_is_opaque_and_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let color = car_color(&mut rng);
            assert_eq!(color[3], 1.0);
            assert!(color[..3].iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}
