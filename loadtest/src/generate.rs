//! Random request parameters: taxon identifiers, name-match queries and
//! cache busters.

use rand::Rng;

/// Characters used in generated taxon identifiers.
///
/// ChecklistBank identifiers avoid glyphs that are easily confused when
/// transcribed (0/O, 1/I) as well as vowels.
pub const ID_ALPHABET: &[u8] = b"23456789BCDFGHJKLMNPQRSTVWXYZ";

const SCIENTIFIC_NAMES: &[&str] = &[
    "Abies alba",
    "Apis mellifera",
    "Canis lupus",
    "Felis catus",
    "Larus fuscus",
    "Parus major",
    "Passer domesticus",
    "Puma concolor",
    "Quercus robur",
    "Turdus merula",
    "Ursus arctos",
    "Vulpes vulpes",
];

const AUTHORSHIPS: &[&str] = &["Linnaeus, 1758", "L.", "Mill.", "(Brünnich, 1764)"];

/// Generates a short random taxon identifier of 2 to 5 characters.
///
/// Each character is drawn independently from [`ID_ALPHABET`], so repeated
/// characters can occur and identifiers are not unique across calls.
pub fn taxon_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.random_range(2..=5);
    (0..len)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Draws a random scientific name for a match query.
pub fn scientific_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SCIENTIFIC_NAMES[rng.random_range(0..SCIENTIFIC_NAMES.len())]
}

/// Draws a random authorship string for a match query.
///
/// Names and authorships are sampled independently, so the combination is
/// not necessarily valid taxonomy. The service only sees plausibly shaped
/// input either way.
pub fn authorship<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AUTHORSHIPS[rng.random_range(0..AUTHORSHIPS.len())]
}

/// A random query value that defeats HTTP caches between otherwise
/// identical match queries.
pub fn cache_buster<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.random_range(1..=99_999_999_999)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn taxon_ids_are_short_and_use_the_restricted_alphabet() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let id = taxon_id(&mut rng);
            assert!((2..=5).contains(&id.len()), "unexpected length: {id}");
            assert!(
                id.bytes().all(|b| ID_ALPHABET.contains(&b)),
                "unexpected character: {id}"
            );
        }
    }

    #[test]
    fn taxon_id_lengths_and_characters_are_roughly_uniform() {
        const N: u32 = 100_000;

        let mut rng = SmallRng::seed_from_u64(2);
        let mut lengths = [0u32; 6];
        let mut characters: BTreeMap<u8, u32> = BTreeMap::new();
        let mut total_chars = 0u32;
        for _ in 0..N {
            let id = taxon_id(&mut rng);
            lengths[id.len()] += 1;
            for b in id.bytes() {
                *characters.entry(b).or_insert(0) += 1;
                total_chars += 1;
            }
        }

        for len in 2..=5 {
            let share = lengths[len] as f64 / N as f64;
            assert!((share - 0.25).abs() < 0.01, "length {len} share {share}");
        }

        assert_eq!(characters.len(), ID_ALPHABET.len());
        let expected = 1.0 / ID_ALPHABET.len() as f64;
        for (b, count) in characters {
            let share = count as f64 / total_chars as f64;
            assert!(
                (share - expected).abs() < 0.005,
                "character {} share {share}",
                b as char
            );
        }
    }

    #[test]
    fn names_and_authorships_come_from_the_fixed_lists() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1_000 {
            assert!(SCIENTIFIC_NAMES.contains(&scientific_name(&mut rng)));
            assert!(AUTHORSHIPS.contains(&authorship(&mut rng)));
        }
        assert_eq!(SCIENTIFIC_NAMES.len(), 12);
        assert_eq!(AUTHORSHIPS.len(), 4);
    }

    #[test]
    fn cache_busters_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..10_000 {
            let bust = cache_buster(&mut rng);
            assert!((1..=99_999_999_999).contains(&bust));
        }
    }
}
