use thiserror::Error;

/// Failures reported by a rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering context unavailable: {0}")]
    Unavailable(String),
    #[error("rendering context lost")]
    ContextLost,
    #[error("failed to compile shader: {0}")]
    Shader(String),
    #[error("failed to link program: {0}")]
    Program(String),
    #[error("failed to create {0}")]
    Resource(&'static str),
}

/// Failures that abort initialization of a map instance.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no element with id `{0}`")]
    SurfaceNotFound(String),
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("canvas `{0}` already hosts a map")]
    AlreadyBound(String),
    #[error("canvas has no parent element")]
    MissingContainer,
    #[error("browser environment unavailable: {0}")]
    Environment(String),
    #[error(transparent)]
    Context(#[from] RenderError),
}
