pub use crate::data_structs::typedef::{
    BinIdx,
    PosType,
    ResType,
    ScoreType,
};
pub use crate::data_structs::{
    bin_to_interval,
    BinInterval,
    InteractionRecord,
    LoopCall,
    LoopSet,
    MergedLoopSet,
};
pub use crate::io::{
    read_interactions,
    read_loop_set,
    read_tiers,
    write_loop_set,
    write_merged,
};
pub use crate::tools::{
    CallConfig,
    CallStrategy,
    CallSummary,
    DensityClusterer,
    LoopCaller,
    ResolutionMerger,
    ScoreFilter,
    ThresholdMode,
};
