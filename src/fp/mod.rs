pub mod builder;
pub mod combinations;
pub mod constraint;
pub mod growth;
pub mod item;
pub mod mining;
pub mod storage;
pub mod summary;
pub mod tree;
pub mod verify;


pub use builder::{Prepared, build_conditional_fp_tree, build_fp_tree};
pub use constraint::{
    Constraint, CorrelationConstraint, FrequencyConstraint, PatternStats, PeriodicConstraint,
    UncertainConstraint, UncertainPeriodicConstraint,
};
pub use growth::Growth;
pub use item::{Item, ItemTable};
pub use mining::{MinedPattern, Miner};
pub use storage::PatternStorage;
pub use summary::{ExpectedSupport, Summary};
pub use tree::{FpNode, FpTree};
pub use verify::verify_expected_support;
