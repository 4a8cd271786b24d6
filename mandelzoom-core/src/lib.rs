pub mod bigfloat;
pub mod complex_delta;
pub mod config;
pub mod ddcomplex;
pub mod error;
pub mod extended;
pub mod pixel_rect;
pub mod pixel_result;
pub mod precision;
pub mod viewport;

pub use bigfloat::BigFloat;
pub use complex_delta::{ComplexDelta, StdComplex};
pub use config::{EngineConfig, DEFAULT_ENGINE_CONFIG};
pub use ddcomplex::DDComplex;
pub use error::EngineError;
pub use extended::ExtendedReal;
pub use pixel_rect::PixelRect;
pub use pixel_result::{Iterations, PixelResult};
pub use precision::{effective_digits, precision_info, select_tier, PrecisionInfo, PrecisionTier};
pub use viewport::Viewport;
