use crate::error::ConfigError;

// Search parameters
pub const DEFAULT_DEPTH: u8 = 3;             // Plies searched below each root move
pub const MAX_DEPTH: u8 = 8;                 // Fixed-depth search gets slow past this
pub const DOMINATION_WEIGHT: i32 = 8;        // Square control counts 1/8 of a centipawn per square
pub const REPETITION_PENALTY: i32 = 5;       // Centipawns taken off a position seen before

/// Which board signals make up the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvalFormula {
    /// Material balance only.
    Material,
    /// Material balance plus square control divided by the domination weight.
    #[default]
    MaterialAndDomination,
}

/// Settings for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched below each root move. Zero scores root moves by the
    /// evaluation of the position they lead to.
    pub depth: u8,
    /// Alpha-beta pruning. Disabling it gives plain minimax over the full tree.
    pub pruning: bool,
    pub formula: EvalFormula,
    pub domination_weight: i32,
    pub repetition_penalty: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            pruning: true,
            formula: EvalFormula::default(),
            domination_weight: DOMINATION_WEIGHT,
            repetition_penalty: REPETITION_PENALTY,
        }
    }
}

impl SearchConfig {
    /// Sets the depth, clamped to `MAX_DEPTH`.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.min(MAX_DEPTH);
        self
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_formula(mut self, formula: EvalFormula) -> Self {
        self.formula = formula;
        self
    }

    pub fn with_domination_weight(mut self, weight: i32) -> Self {
        self.domination_weight = weight;
        self
    }

    pub fn with_repetition_penalty(mut self, penalty: i32) -> Self {
        self.repetition_penalty = penalty;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domination_weight <= 0 {
            return Err(ConfigError::InvalidDominationWeight(self.domination_weight));
        }
        if self.repetition_penalty < 0 {
            return Err(ConfigError::NegativeRepetitionPenalty(self.repetition_penalty));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SearchConfig::default();
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert!(config.pruning);
        assert_eq!(config.formula, EvalFormula::MaterialAndDomination);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn depth_is_clamped() {
        assert_eq!(SearchConfig::default().with_depth(200).depth, MAX_DEPTH);
        assert_eq!(SearchConfig::default().with_depth(0).depth, 0);
    }

    #[test]
    fn rejects_bad_weights() {
        assert_eq!(
            SearchConfig::default().with_domination_weight(0).validate(),
            Err(ConfigError::InvalidDominationWeight(0))
        );
        assert_eq!(
            SearchConfig::default().with_repetition_penalty(-1).validate(),
            Err(ConfigError::NegativeRepetitionPenalty(-1))
        );
    }
}
