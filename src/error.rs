use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Reciprocal requested for a zero divisor")]
    ZeroDivisor,
    #[error("Reciprocal unit already has a request in flight")]
    ReciprocalBusy,
    #[error("Reciprocal unit needs at least one refinement step")]
    InvalidReciprocalSteps,
    #[error("{0}x{1} is not a valid framebuffer size")]
    InvalidFramebuffer(u32, u32),
    #[error("Viewport must have a positive width and height")]
    InvalidViewport,
    #[error("Configuration cannot change while primitives are in flight")]
    PipelineBusy,
}

pub type RenderResult<T> = Result<T, RenderError>;
