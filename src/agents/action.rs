//! Flat action encoding: `action = concept * n_styles + style`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::generate::N_LEARNING_STYLES;

/// A decoded action: teach `concept` using learning style `style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeachingExample {
    pub concept: usize,
    pub style: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    n_concepts: usize,
    n_styles: usize,
}

impl ActionSpace {
    /// Action space over `n_concepts` concepts and the four VARK styles.
    #[must_use]
    pub const fn new(n_concepts: usize) -> Self {
        Self::with_styles(n_concepts, N_LEARNING_STYLES)
    }

    #[must_use]
    pub const fn with_styles(n_concepts: usize, n_styles: usize) -> Self {
        Self {
            n_concepts,
            n_styles,
        }
    }

    #[must_use]
    pub const fn n_concepts(&self) -> usize {
        self.n_concepts
    }

    #[must_use]
    pub const fn n_styles(&self) -> usize {
        self.n_styles
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.n_concepts * self.n_styles
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn encode(&self, concept: usize, style: usize) -> Result<usize> {
        if concept >= self.n_concepts || style >= self.n_styles {
            return Err(SimError::InvalidArgument(format!(
                "cannot encode concept {concept} / style {style} in a {}x{} action space",
                self.n_concepts, self.n_styles
            )));
        }
        Ok(concept * self.n_styles + style)
    }

    pub fn decode(&self, action: usize) -> Result<TeachingExample> {
        if action >= self.len() {
            return Err(SimError::InvalidArgument(format!(
                "action {action} out of range (0..{})",
                self.len()
            )));
        }
        Ok(TeachingExample {
            concept: action / self.n_styles,
            style: action % self.n_styles,
        })
    }
}
