use super::SplitStrategy;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BvhBuildOptions {
    pub strategy: SplitStrategy,

    /// Nodes at this depth are not split any further; the root sits at depth
    /// zero.
    ///
    /// When `None`, splitting continues until a split would leave one side
    /// empty.
    pub max_depth: Option<u32>,
}

impl BvhBuildOptions {
    pub fn with_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
