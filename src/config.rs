// src/config.rs

/// 命名空间中的声明如何分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NamespacePolicy {
    /// 命名空间不产生自己的分类，按外层规则分类（通常是 `global`）
    #[default]
    Transparent,
    /// 直接位于命名空间中的声明分类为 `namespace`，外围实体为命名空间名
    Distinct,
}

/// 解析器配置。
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    pub namespace_policy: NamespacePolicy,
}

impl ResolverConfig {
    pub fn with_namespace_policy(mut self, policy: NamespacePolicy) -> Self {
        self.namespace_policy = policy;
        self
    }
}
