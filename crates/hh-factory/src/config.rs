/// Configuration for loading definition files.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// File extension of definition files, without the dot.
    pub extension: String,
    /// Abort a bulk load on the first bad file instead of skipping it.
    pub strict: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            strict: false,
        }
    }
}

impl FactoryConfig {
    /// Set the definition file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Stop at the first malformed definition.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
