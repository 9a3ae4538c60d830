//! GPU device + surface management.
//!
//! - `Gpu` creates the instance/adapter/device/queue and owns the surface
//! - frames are acquired with `begin_frame` and presented by `submit`

mod error;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
