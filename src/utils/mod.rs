/// Label-matrix utilities
pub mod classes;

/// Quiet metrics renderer for headless training
pub mod renderer;

/// Tensor utilities
pub mod tensors;
