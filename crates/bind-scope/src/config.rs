/// Scope tree settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConfig {
    /// Context id that always resolves to the global context, regardless of
    /// where in the tree it is looked up.
    pub global_context_id: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        ScopeConfig {
            global_context_id: "global".to_string(),
        }
    }
}

impl ScopeConfig {
    pub fn with_global_context_id(mut self, id: impl Into<String>) -> Self {
        self.global_context_id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_global_id() {
        assert_eq!(ScopeConfig::default().global_context_id, "global");
        assert_eq!(
            ScopeConfig::default()
                .with_global_context_id("app")
                .global_context_id,
            "app"
        );
    }
}
