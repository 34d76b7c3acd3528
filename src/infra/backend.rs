//! Backend selection.
//!
//! Training runs on `Autodiff<InferBackend>`; everything that must not
//! track gradients (encode, predict, evaluation) runs on `InferBackend`
//! through `model.valid()`.

use burn::prelude::Backend;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray<f32>;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub fn default_device() -> <InferBackend as Backend>::Device {
    Default::default()
}
