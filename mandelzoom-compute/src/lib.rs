pub mod cancellation;
pub mod direct;
pub mod dispatcher;
pub mod evaluator;
pub mod observation;
pub mod perturbation;

pub use cancellation::{CancellationChecker, GenerationChecker, NeverCancel};
pub use direct::{iterate_double_double, iterate_standard, IterationParams};
pub use dispatcher::{DispatcherHandle, DispatcherState, EvaluationDispatcher};
pub use evaluator::{DeltaPrecision, Evaluator, Frame};
pub use observation::{
    IterationObserver, NoObserver, Observation, ObservationRequest, ObservationScope,
    ObservedValue, RequestObserver,
};
pub use perturbation::{
    compute_pixel_perturbation, detect_glitch, GlitchKind, OrbitPoint, PixelDelta,
    ReferenceOrbit, ReferenceOrbitComputer,
};

// Re-export core types for convenience
pub use mandelzoom_core::*;
