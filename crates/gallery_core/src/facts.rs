//! Random space fact shown once when the page starts.

use tracing::warn;

use crate::view::{Element, Tag, View};

pub const FACT_LABEL: &str = "Did you know?";
pub const FACT_SUFFIX: &str = "— A fun space fact";

pub const SPACE_FACTS: [&str; 6] = [
    "Did you know the footprints on the Moon will likely remain for millions of years because there's no wind to erase them?",
    "A day on Venus is longer than a year on Venus — it rotates very slowly compared to its orbit.",
    "Neutron stars are so dense that a teaspoon of neutron star material would weigh about a billion tons on Earth.",
    "There are thousands of exoplanets discovered outside our solar system; some orbit two stars at once.",
    "Jupiter's magnetic field is 20,000 times stronger than Earth's — it traps intense radiation belts.",
    "Space is not completely empty — there are particles, radiation, and tiny amounts of gas between stars.",
];

#[derive(Debug, Clone, Copy)]
pub struct FactPicker {
    facts: &'static [&'static str],
}

impl Default for FactPicker {
    fn default() -> Self {
        Self::new(&SPACE_FACTS)
    }
}

impl FactPicker {
    pub fn new(facts: &'static [&'static str]) -> Self {
        Self { facts }
    }

    /// Picks one fact uniformly at random.
    pub fn pick(&self) -> Option<&'static str> {
        if self.facts.is_empty() {
            return None;
        }
        self.pick_with(random_index(self.facts.len()))
    }

    pub fn pick_with(&self, index: usize) -> Option<&'static str> {
        if self.facts.is_empty() {
            return None;
        }
        self.facts.get(index % self.facts.len()).copied()
    }
}

// Rejection sampling keeps the distribution uniform for any list length.
fn random_index(len: usize) -> usize {
    let len = len as u64;
    let zone = u64::MAX - (u64::MAX % len);
    loop {
        let mut bytes = [0u8; 8];
        if let Err(err) = getrandom::fill(&mut bytes) {
            warn!(error = %err, "OS entropy unavailable; showing the first fact");
            return 0;
        }
        let sample = u64::from_le_bytes(bytes);
        if sample < zone {
            return (sample % len) as usize;
        }
    }
}

/// Content of the fact region: label, fact, attribution.
pub fn render_fact(fact: &str) -> Vec<View> {
    vec![
        Element::new(Tag::Strong).text(FACT_LABEL).into(),
        View::text(format!(" {fact} ")),
        Element::new(Tag::Small).text(FACT_SUFFIX).into(),
    ]
}
