//! Cross-module tests for the rewrite pipeline, driven through `MemoryRuntime`.
