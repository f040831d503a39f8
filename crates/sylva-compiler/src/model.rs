//! High-level compile facade: source trees in, verified forest and C out.

use sylva_core::verify::{check_leaf_capacity, check_leaf_payloads};
use sylva_core::{ConfigError, Forest, ForestConfig, LeafBits, ModelKind, NumericType};

use crate::SourceTree;
use crate::codegen::{self, EmitOptions};
use crate::pipeline::{DedupReport, LeafMode, dedup_leaves, flatten_tree, merge_trees};

/// Compile-time model description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) kind: ModelKind,
    pub(crate) class_count: u32,
    pub(crate) feature_count: u32,
    pub(crate) numeric_type: NumericType,
    /// `None` picks `0` for classifiers and `32` for regressors.
    pub(crate) leaf_bits: Option<LeafBits>,
    /// `None` picks majority class for classifiers and value for regressors.
    pub(crate) leaf_mode: Option<LeafMode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: ModelKind::Classifier,
            class_count: 0,
            feature_count: 0,
            numeric_type: NumericType::default(),
            leaf_bits: None,
            leaf_mode: None,
        }
    }
}

impl Config {
    /// Classifier over `class_count` classes.
    pub fn classifier(class_count: u32) -> Self {
        Self {
            class_count,
            ..Self::default()
        }
    }

    pub fn regressor() -> Self {
        Self {
            kind: ModelKind::Regressor,
            ..Self::default()
        }
    }

    /// Number of input features; `0` leaves feature indices unchecked.
    pub fn feature_count(mut self, value: u32) -> Self {
        self.feature_count = value;
        self
    }

    /// Element type of features and thresholds in generated code.
    pub fn numeric_type(mut self, value: NumericType) -> Self {
        self.numeric_type = value;
        self
    }

    pub fn leaf_bits(mut self, value: LeafBits) -> Self {
        self.leaf_bits = Some(value);
        self
    }

    /// Override how leaf statistics become payloads.
    pub fn leaf_mode(mut self, value: LeafMode) -> Self {
        self.leaf_mode = Some(value);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kind.is_classifier() && self.class_count == 0 {
            return Err(ConfigError::NoClasses);
        }
        if let Some(LeafMode::Probabilities { bits }) = self.leaf_mode
            && !(1..=8).contains(&bits)
        {
            return Err(ConfigError::InvalidProbabilityBits(bits));
        }
        let mode = self.resolved_leaf_mode();
        let fits = match self.kind {
            ModelKind::Classifier => !matches!(mode, LeafMode::Value),
            ModelKind::Regressor => mode == LeafMode::Value,
        };
        if !fits {
            return Err(ConfigError::LeafKindMismatch {
                expected: self.kind.name(),
                found: mode.payload_name(),
            });
        }
        Ok(())
    }

    pub fn resolved_leaf_mode(&self) -> LeafMode {
        self.leaf_mode.unwrap_or(match self.kind {
            ModelKind::Classifier => LeafMode::Majority,
            ModelKind::Regressor => LeafMode::Value,
        })
    }

    pub fn forest_config(&self) -> ForestConfig {
        let base = match self.kind {
            ModelKind::Classifier => ForestConfig::classifier(self.feature_count, self.class_count),
            ModelKind::Regressor => ForestConfig::regressor(self.feature_count),
        };
        let base = base.numeric_type(self.numeric_type);
        match self.leaf_bits {
            Some(bits) => base.leaf_bits(bits),
            None => base,
        }
    }
}

/// Runs flatten, merge and leaf deduplication over an ensemble.
#[derive(Clone, Debug)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the deduplicated forest for `trees`.
    ///
    /// Per-tree failures carry the index of the offending tree.
    pub fn compile(&self, trees: &[SourceTree]) -> crate::Result<CompiledForest> {
        self.config.validate()?;
        let mode = self.config.resolved_leaf_mode();

        let mut flat = Vec::with_capacity(trees.len());
        for (index, tree) in trees.iter().enumerate() {
            let tree = flatten_tree(tree, mode).map_err(|e| e.at_tree(index))?;
            tracing::debug!(
                tree = index,
                nodes = tree.nodes.len(),
                leaves = tree.leaves.len(),
                "flattened tree"
            );
            flat.push(tree);
        }

        let merged = merge_trees(&flat, self.config.forest_config())?;
        let (forest, report) = dedup_leaves(&merged)?;
        check_leaf_capacity(forest.leaves().len())?;
        check_leaf_payloads(forest.leaves(), forest.config())?;

        tracing::info!(
            trees = forest.n_trees(),
            nodes = forest.nodes().len(),
            leaves = forest.leaves().len(),
            "compiled forest"
        );
        Ok(CompiledForest { forest, report })
    }
}

/// A verified, deduplicated forest ready for emission.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledForest {
    forest: Forest,
    report: DedupReport,
}

impl CompiledForest {
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Leaf deduplication summary.
    pub fn report(&self) -> DedupReport {
        self.report
    }

    /// C source for every strategy in `options`, loadable first.
    pub fn emit(&self, options: &EmitOptions) -> crate::Result<String> {
        codegen::emit(&self.forest, options)
    }

    pub fn to_csv(&self) -> String {
        codegen::to_csv(&self.forest)
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }
}
