/// Identity-generation capability. Implementations pick their entropy
/// source at construction time; callers never feature-detect per call.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}
