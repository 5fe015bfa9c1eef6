//! Mock data generation for testing and demos.
//!
//! Pure functions with no side effects; the in-memory transport seeds
//! itself from here.

use super::types::{Sushi, SushiType};

const NIGIRI: [(&str, &str, &str, f64); 5] = [
    ("Salmon Nigiri", "Salmon", "Fresh", 4.5),
    ("Tuna Nigiri", "Tuna", "Fresh", 5.0),
    ("Unagi Nigiri", "Eel", "Grilled", 6.25),
    ("Saba Nigiri", "Mackerel", "Cured", 3.75),
    ("Smoked Salmon Nigiri", "Salmon", "Smoked", 4.95),
];

const ROLLS: [(&str, &str, u32, f64); 5] = [
    ("California Roll", "Crab", 8, 8.0),
    ("Spicy Tuna Roll", "Tuna", 6, 9.5),
    ("Dragon Roll", "Eel", 8, 12.0),
    ("Salmon Avocado Roll", "Salmon", 6, 7.25),
    ("Rainbow Roll", "Assorted", 8, 13.5),
];

/// Generate `count` sushi items alternating between nigiri and rolls.
///
/// Ids are deterministic (`"seed-1"`, `"seed-2"`, ...) so tests can refer
/// to them directly.
///
/// # Example
///
/// ```
/// use sushisync_core::sushi::generate_seed_sushi;
///
/// let items = generate_seed_sushi(6);
///
/// assert_eq!(items.len(), 6);
/// assert_eq!(items[0].id, "seed-1");
/// ```
pub fn generate_seed_sushi(count: usize) -> Vec<Sushi> {
    (0..count)
        .map(|i| {
            let id = format!("seed-{}", i + 1);
            let pick = i / 2 % 5;
            if i % 2 == 0 {
                let (name, fish, fish_type, price) = NIGIRI[pick];
                Sushi::new(id, name, SushiType::Nigiri, price)
                    .with_fish(fish)
                    .with_fish_type(fish_type)
                    .with_pieces(2)
                    .with_image(image_url(name))
            } else {
                let (name, fish, pieces, price) = ROLLS[pick];
                Sushi::new(id, name, SushiType::Roll, price)
                    .with_fish(fish)
                    .with_pieces(pieces)
                    .with_image(image_url(name))
            }
        })
        .collect()
}

fn image_url(name: &str) -> String {
    let slug = name.to_lowercase().replace(' ', "-");
    format!("https://example.com/images/{slug}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_alternates_types() {
        let items = generate_seed_sushi(4);

        assert_eq!(items[0].sushi_type, SushiType::Nigiri);
        assert_eq!(items[1].sushi_type, SushiType::Roll);
        assert_eq!(items[2].sushi_type, SushiType::Nigiri);
        assert_eq!(items[3].sushi_type, SushiType::Roll);
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let items = generate_seed_sushi(20);
        let mut ids: Vec<&str> = items.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_seed_image_slug() {
        let items = generate_seed_sushi(1);
        assert_eq!(
            items[0].image,
            "https://example.com/images/salmon-nigiri.jpg"
        );
    }

    #[test]
    fn test_seed_empty() {
        assert!(generate_seed_sushi(0).is_empty());
    }
}
