//! Random document generation and controlled mutation.
//!
//! Documents are built from fixed vocabulary pools so generated output looks
//! like plausible application data rather than noise. Generation is fully
//! deterministic for a seeded RNG.

use abx_tree::Element;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::profile::GenProfile;

const ELEMENT_NAMES: &[&str] = &[
    "user", "product", "order", "item", "category", "company", "employee", "customer", "address",
    "contact", "department", "project", "task", "config", "setting", "data", "record", "entry",
    "node", "info",
];

const ATTR_NAMES: &[&str] = &[
    "id", "name", "type", "status", "version", "date", "value", "code",
];

const ATTR_VALUES: &[&str] = &[
    "active", "pending", "completed", "draft", "published", "archived",
];

const TEXT_SAMPLES: &[&str] = &[
    "Sample text content with more data to increase file size significantly",
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt",
    "Test data with extended information and additional details for larger XML generation",
    "Example value containing multiple words and longer descriptions to fill up space",
    "Random content generated with extra text to make the XML files bigger and more realistic",
    "A1B2C3D4E5F6G7H8I9J0K1L2M3N4O5P6Q7R8S9T0U1V2W3X4Y5Z6",
    "2024-01-15T10:30:45Z with additional timestamp metadata and timezone information",
    "42 is the answer to life, the universe, and everything according to Douglas Adams",
    "3.14159265358979323846264338327950288419716939937510",
];

/// Generate a random document tree according to `profile`.
pub fn generate<R: Rng>(rng: &mut R, profile: &GenProfile) -> Element {
    generate_element(rng, profile, 0)
}

fn generate_element<R: Rng>(rng: &mut R, profile: &GenProfile, depth: usize) -> Element {
    let tag = *ELEMENT_NAMES.choose(rng).expect("non-empty pool");
    let mut element = Element::new(tag);

    let attr_count = rng.gen_range(profile.min_attrs..=profile.max_attrs);
    for _ in 0..attr_count {
        let name = *ATTR_NAMES.choose(rng).expect("non-empty pool");
        let value = random_attr_value(rng);
        // Repeated names overwrite; attribute keys stay unique.
        element.attributes.insert(name.to_string(), value);
    }

    if rng.gen_bool(profile.text_probability) {
        element.text = Some(TEXT_SAMPLES.choose(rng).expect("non-empty pool").to_string());
    }

    if depth < profile.max_depth {
        let child_count = rng.gen_range(profile.min_children..=profile.max_children);
        for _ in 0..child_count {
            element
                .children
                .push(generate_element(rng, profile, depth + 1));
        }
    }

    element
}

fn random_attr_value<R: Rng>(rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        ATTR_VALUES.choose(rng).expect("non-empty pool").to_string()
    } else {
        rng.gen_range(1..=100_000u32).to_string()
    }
}

/// Produce a perturbed copy of a document.
///
/// Each element independently gets, with probability `change_prob`: its text
/// replaced, each attribute value rewritten; with `change_prob / 2` a new
/// attribute; with `change_prob / 3` an extra shallow child appended. The
/// result is structurally close to the input but reliably divergent.
pub fn mutate<R: Rng>(rng: &mut R, original: &Element, change_prob: f64) -> Element {
    let mut copy = original.clone();
    mutate_element(rng, &mut copy, change_prob);
    copy
}

fn mutate_element<R: Rng>(rng: &mut R, element: &mut Element, change_prob: f64) {
    if element.text.is_some() && rng.gen_bool(change_prob) {
        element.text = Some(TEXT_SAMPLES.choose(rng).expect("non-empty pool").to_string());
    }

    let names: Vec<String> = element.attributes.keys().cloned().collect();
    for name in names {
        if rng.gen_bool(change_prob) {
            let modified = format!("modified_{}", rng.gen_range(1..=100_000u32));
            element.attributes.insert(name, modified);
        }
    }

    if rng.gen_bool(change_prob / 2.0) {
        let name = *ATTR_NAMES.choose(rng).expect("non-empty pool");
        let value = *ATTR_VALUES.choose(rng).expect("non-empty pool");
        element.attributes.insert(name.to_string(), value.to_string());
    }

    for child in &mut element.children {
        mutate_element(rng, child, change_prob);
    }

    if element.children.len() < 10 && rng.gen_bool(change_prob / 3.0) {
        let shallow = GenProfile {
            max_depth: 2,
            ..Default::default()
        };
        element.children.push(generate_element(rng, &shallow, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_document() {
        let profile = GenProfile::default();
        let a = generate(&mut StdRng::seed_from_u64(7), &profile);
        let b = generate(&mut StdRng::seed_from_u64(7), &profile);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let profile = GenProfile::default();
        let a = generate(&mut StdRng::seed_from_u64(1), &profile);
        let b = generate(&mut StdRng::seed_from_u64(2), &profile);
        assert_ne!(a, b);
    }

    #[test]
    fn respects_depth_and_child_bounds() {
        let profile = GenProfile {
            max_depth: 2,
            min_children: 1,
            max_children: 3,
            ..Default::default()
        };
        let doc = generate(&mut StdRng::seed_from_u64(42), &profile);
        assert!(doc.depth() <= 3);
        check_child_bounds(&doc, &profile);
    }

    fn check_child_bounds(el: &Element, profile: &GenProfile) {
        if !el.children.is_empty() {
            assert!(el.children.len() >= profile.min_children);
            assert!(el.children.len() <= profile.max_children);
        }
        for child in &el.children {
            check_child_bounds(child, profile);
        }
    }

    #[test]
    fn attributes_within_bounds() {
        let profile = GenProfile {
            max_depth: 1,
            min_attrs: 2,
            max_attrs: 4,
            ..Default::default()
        };
        let doc = generate(&mut StdRng::seed_from_u64(9), &profile);
        // Duplicate names may collapse, so only the upper bound is firm.
        assert!(doc.attributes.len() <= 4);
        assert!(!doc.attributes.is_empty());
    }

    #[test]
    fn zero_text_probability_means_no_text() {
        let profile = GenProfile {
            text_probability: 0.0,
            max_depth: 2,
            ..Default::default()
        };
        let doc = generate(&mut StdRng::seed_from_u64(3), &profile);
        assert_no_text(&doc);
    }

    fn assert_no_text(el: &Element) {
        assert!(el.text.is_none());
        for child in &el.children {
            assert_no_text(child);
        }
    }

    #[test]
    fn mutation_is_detected_by_the_comparator() {
        let profile = GenProfile::default();
        let mut rng = StdRng::seed_from_u64(11);
        let original = generate(&mut rng, &profile);
        let mutated = mutate(&mut rng, &original, 0.5);

        let diff = abx_diff::diff_elements(&original, &mutated);
        assert!(!diff.is_empty(), "mutation produced an identical document");
    }

    #[test]
    fn zero_change_prob_is_identity() {
        let profile = GenProfile::default();
        let mut rng = StdRng::seed_from_u64(13);
        let original = generate(&mut rng, &profile);
        let copy = mutate(&mut rng, &original, 0.0);
        assert_eq!(original, copy);
    }
}
