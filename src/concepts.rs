//! Concept naming.
//!
//! Concepts are plain indices; for display they get spreadsheet-column style
//! names: `A..Z`, then `AA..ZZ`, then `AAA..ZZZ`, and so on.

use std::collections::HashMap;

use crate::error::{Result, SimError};

const ALPHABET: usize = 26;

/// Name for a concept index.
#[must_use]
pub fn concept_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(letter(n % ALPHABET));
        if n < ALPHABET {
            break;
        }
        n = n / ALPHABET - 1;
    }
    letters.iter().rev().collect()
}

/// Name for a signed concept index. Negative indices are rejected.
pub fn try_concept_name(index: i64) -> Result<String> {
    let index = usize::try_from(index).map_err(|_| {
        SimError::InvalidArgument(format!("concept index must be non-negative, got {index}"))
    })?;
    Ok(concept_name(index))
}

/// Inverse of [`concept_name`].
pub fn concept_index(name: &str) -> Result<usize> {
    if name.is_empty() {
        return Err(SimError::InvalidArgument(
            "concept name must not be empty".to_string(),
        ));
    }

    let mut value: usize = 0;
    for ch in name.chars() {
        if !ch.is_ascii_uppercase() {
            return Err(SimError::InvalidArgument(format!(
                "invalid character {ch:?} in concept name {name:?}"
            )));
        }
        let digit = (ch as usize) - ('A' as usize) + 1;
        value = value
            .checked_mul(ALPHABET)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| {
                SimError::InvalidArgument(format!("concept name {name:?} is too long"))
            })?;
    }
    Ok(value - 1)
}

fn letter(offset: usize) -> char {
    // offset is always < 26
    char::from(b'A' + offset as u8)
}

/// Names for the first `n` concepts together with the reverse lookup.
#[derive(Debug, Clone, Default)]
pub struct ConceptNames {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ConceptNames {
    #[must_use]
    pub fn new(n: usize) -> Self {
        let names: Vec<String> = (0..n).map(concept_name).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZZZ: usize = 26 * 26 * 26 + 26 * 26 + 26 - 1;

    #[test]
    fn single_letters() {
        assert_eq!(concept_name(0), "A");
        assert_eq!(concept_name(25), "Z");
    }

    #[test]
    fn length_boundaries() {
        assert_eq!(concept_name(26), "AA");
        assert_eq!(concept_name(27), "AB");
        assert_eq!(concept_name(701), "ZZ");
        assert_eq!(concept_name(702), "AAA");
        assert_eq!(concept_name(ZZZ), "ZZZ");
        assert_eq!(concept_name(ZZZ + 1), "AAAA");
        assert_eq!(concept_name(ZZZ + 2), "AAAB");
    }

    #[test]
    fn round_trip_through_three_letters() {
        for i in 0..=ZZZ {
            assert_eq!(concept_index(&concept_name(i)).unwrap(), i);
        }
    }

    #[test]
    fn negative_index_rejected() {
        let err = try_concept_name(-1).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
        assert_eq!(try_concept_name(28).unwrap(), "AC");
    }

    #[test]
    fn bad_names_rejected() {
        assert!(concept_index("").is_err());
        assert!(concept_index("a").is_err());
        assert!(concept_index("A1").is_err());
        assert!(concept_index(&"Z".repeat(40)).is_err());
    }

    #[test]
    fn concept_names_lookup() {
        let names = ConceptNames::new(30);
        assert_eq!(names.len(), 30);
        assert_eq!(names.name(26), Some("AA"));
        assert_eq!(names.index_of("AD"), Some(29));
        assert_eq!(names.index_of("AE"), None);
        assert_eq!(names.name(30), None);
    }

    #[test]
    fn first_names_snapshot() {
        let names = ConceptNames::new(30);
        let joined = names.iter().collect::<Vec<_>>().join(",");
        insta::assert_snapshot!(joined, @"A,B,C,D,E,F,G,H,I,J,K,L,M,N,O,P,Q,R,S,T,U,V,W,X,Y,Z,AA,AB,AC,AD");
    }
}
