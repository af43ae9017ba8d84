//! Layer 4: Operator
//!
//! # Purpose
//!
//! This layer defines the gridding operator family returned by the factory:
//! the shared [`GriddingOperator`] interface, the four variants
//! (default, texture, balanced, balanced texture), the flat [`Operator`] enum
//! and the [`PrecomputedOperator`] consumed by the load path.
//!
//! # Design notes
//!
//! * **Flat dispatch**: The factory selects a variant from the interpolation
//!   type and the balance flag in one step ([`OperatorType::select`]).
//! * **Composition**: Variants wrap an [`OperatorCore`] instead of inheriting
//!   from one another. Only balanced variants carry a processing order.
//! * **Execution seam**: `perform_forward`/`perform_adjoint` move data between
//!   caller order and sector-sorted order and delegate the kernels to a
//!   [`TransformExecutor`].
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Operator ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// State shared by every variant.
pub mod core;

/// Concrete operator variants.
pub mod variants;

/// Transportable derived state.
pub mod precomputed;

/// Boundary to the gridding kernels.
pub mod transform;

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// External dependencies
use ::core::fmt::{Display, Formatter, Result as FmtResult};
use num_complex::Complex;
use num_traits::{Float, Zero};

// Internal dependencies
use crate::algorithms::processing_order::ProcessingChunk;
use crate::primitives::buffer::Array;
use crate::primitives::dimensions::Dimensions;
use crate::primitives::errors::NufftError;
use crate::primitives::sorting::{gather, unsort};

use self::core::OperatorCore;
use self::precomputed::PrecomputedOperator;
use self::transform::{GriddingPlan, TransformExecutor};
use self::variants::{BalancedOperator, BalancedTextureOperator, DefaultOperator, TextureOperator};

// ============================================================================
// Tags
// ============================================================================

/// Variant tag of a gridding operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorType {
    /// Lookup-table interpolation, one work unit per sector.
    Default,

    /// Texture interpolation, one work unit per sector.
    Texture,

    /// Lookup-table interpolation over balanced chunks.
    Balanced,

    /// Texture interpolation over balanced chunks.
    BalancedTexture,
}

impl OperatorType {
    /// Select the variant for an interpolation type and balance flag.
    pub fn select(interpolation: InterpolationType, balance_workload: bool) -> Self {
        match (interpolation.is_texture(), balance_workload) {
            (false, false) => Self::Default,
            (true, false) => Self::Texture,
            (false, true) => Self::Balanced,
            (true, true) => Self::BalancedTexture,
        }
    }

    /// Whether this variant schedules balanced chunks.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced | Self::BalancedTexture)
    }
}

impl Display for OperatorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Self::Default => "default",
            Self::Texture => "texture",
            Self::Balanced => "balanced",
            Self::BalancedTexture => "balanced texture",
        };
        write!(f, "{name}")
    }
}

/// Kernel interpolation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationType {
    /// Precomputed lookup table in constant memory.
    #[default]
    ConstLookup,

    /// 1D texture lookup.
    TextureLookup,

    /// 2D texture lookup.
    Texture2dLookup,

    /// 3D texture lookup.
    Texture3dLookup,
}

impl InterpolationType {
    /// Whether the mode reads the kernel from texture memory.
    #[inline]
    pub fn is_texture(&self) -> bool {
        !matches!(self, Self::ConstLookup)
    }
}

impl From<u32> for InterpolationType {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::TextureLookup,
            2 => Self::Texture2dLookup,
            3 => Self::Texture3dLookup,
            _ => Self::ConstLookup,
        }
    }
}

// ============================================================================
// Operator Interface
// ============================================================================

/// Interface shared by all gridding operators.
///
/// Implementors supply the core and the variant-specific pieces; everything
/// else, including the forward and adjoint entry points, is provided.
pub trait GriddingOperator<T: Float> {
    /// Variant tag.
    fn operator_type(&self) -> OperatorType;

    /// Interpolation mode.
    fn interpolation_type(&self) -> InterpolationType;

    /// Shared derived state.
    fn core(&self) -> &OperatorCore<T>;

    /// Balanced chunk list, `None` for non-balanced variants.
    fn sector_processing_order(&self) -> Option<&Array<ProcessingChunk>>;

    /// Upper bound on samples per chunk, `None` for non-balanced variants.
    fn maximum_payload(&self) -> Option<usize>;

    /// Replace the balanced chunk list.
    ///
    /// The new order must cover every sample exactly once with chunks of the
    /// operator's payload, otherwise [`NufftError::InvalidPrecomputed`] is
    /// returned and the current order is kept. Non-balanced variants return
    /// [`NufftError::UnsupportedFeature`].
    fn set_sector_processing_order(
        &mut self,
        order: Array<ProcessingChunk>,
    ) -> Result<(), NufftError>;

    /// Per-sector offsets into the sorted samples.
    fn sector_data_count<'a>(&'a self) -> &'a Array<usize>
    where
        T: 'a,
    {
        self.core().sector_data_count()
    }

    /// Sector-sorted trajectory.
    fn k_space_traj(&self) -> &Array<T> {
        self.core().k_space_traj()
    }

    /// Sorted position → original sample index.
    fn data_indices<'a>(&'a self) -> &'a Array<usize>
    where
        T: 'a,
    {
        self.core().data_indices()
    }

    /// Flattened sector centers.
    fn sector_centers<'a>(&'a self) -> &'a Array<usize>
    where
        T: 'a,
    {
        self.core().sector_centers()
    }

    /// Sorted density weights, if attached.
    fn dens(&self) -> Option<&Array<T>> {
        self.core().dens()
    }

    /// Coil sensitivities, if attached.
    fn sens(&self) -> Option<&Array<Complex<T>>> {
        self.core().sens()
    }

    /// Target image dimensions.
    fn img_dims(&self) -> Dimensions {
        self.core().img_dims()
    }

    /// Oversampled grid dimensions.
    fn grid_dims(&self) -> Dimensions {
        self.core().grid_dims()
    }

    /// Sector grid dimensions.
    fn grid_sector_dims(&self) -> Dimensions {
        self.core().grid_sector_dims()
    }

    /// Kernel width.
    fn kernel_width(&self) -> usize {
        self.core().kernel_width()
    }

    /// Sector width.
    fn sector_width(&self) -> usize {
        self.core().sector_width()
    }

    /// Oversampling ratio.
    fn osf(&self) -> T {
        self.core().osf()
    }

    /// Whether the operator grids a 2D image.
    fn is_2d(&self) -> bool {
        self.core().is_2d()
    }

    /// Whether the operator grids a 3D volume.
    fn is_3d(&self) -> bool {
        self.core().is_3d()
    }

    /// Borrowed view handed to transform kernels.
    fn plan(&self) -> GriddingPlan<'_, T> {
        GriddingPlan {
            operator_type: self.operator_type(),
            interpolation: self.interpolation_type(),
            core: self.core(),
            processing_order: self.sector_processing_order().map(|o| o.as_slice()),
            maximum_payload: self.maximum_payload(),
        }
    }

    /// Adjoint transform (k-space → image).
    ///
    /// `kspace` holds one value per sample in caller order. It is gathered
    /// into sector-sorted order before the executor runs.
    fn perform_adjoint(
        &self,
        executor: &dyn TransformExecutor<T>,
        kspace: &Array<Complex<T>>,
    ) -> Result<Array<Complex<T>>, NufftError> {
        if kspace.dim.channel_count() > 1 {
            return Err(NufftError::UnsupportedFeature {
                target: "perform_adjoint",
                feature: "multi-channel k-space data",
            });
        }
        let core = self.core();
        let n = core.sample_count();
        if kspace.data.len() != n {
            return Err(NufftError::MismatchedLength {
                name: "kspace",
                expected: n,
                got: kspace.data.len(),
            });
        }

        let sorted = gather(&kspace.data, &core.data_indices().data);
        let img_dims = core.img_dims();
        let mut image = vec![Complex::zero(); img_dims.count()];
        executor.adjoint(&self.plan(), &sorted, &mut image)?;

        Ok(Array::new(image, img_dims))
    }

    /// Forward transform (image → k-space).
    ///
    /// The executor writes sector-sorted samples, which are scattered back to
    /// caller order before returning.
    fn perform_forward(
        &self,
        executor: &dyn TransformExecutor<T>,
        image: &Array<Complex<T>>,
    ) -> Result<Array<Complex<T>>, NufftError> {
        if image.dim.channel_count() > 1 {
            return Err(NufftError::UnsupportedFeature {
                target: "perform_forward",
                feature: "multi-channel image data",
            });
        }
        let core = self.core();
        let expected = core.img_dims().count();
        if image.data.len() != expected {
            return Err(NufftError::MismatchedLength {
                name: "image",
                expected,
                got: image.data.len(),
            });
        }

        let mut sorted = vec![Complex::zero(); core.sample_count()];
        executor.forward(&self.plan(), &image.data, &mut sorted)?;

        Ok(Array::linear(unsort(&sorted, &core.data_indices().data)))
    }

    /// Export the derived arrays for the load path.
    fn to_precomputed(&self) -> PrecomputedOperator<T> {
        let core = self.core();
        PrecomputedOperator {
            k_space_traj: core.k_space_traj.clone(),
            data_indices: core.data_indices.clone(),
            sector_data_count: core.sector_data_count.clone(),
            sector_processing_order: self
                .sector_processing_order()
                .cloned()
                .unwrap_or_else(|| Array::linear(Vec::new())),
            sector_centers: core.sector_centers.clone(),
            dens: core.dens.clone(),
            sens: core.sens.clone(),
        }
    }
}

// ============================================================================
// Tagged Operator
// ============================================================================

/// A gridding operator of any variant, as returned by the factory.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator<T> {
    /// Lookup-table operator.
    Default(DefaultOperator<T>),

    /// Texture operator.
    Texture(TextureOperator<T>),

    /// Balanced lookup-table operator.
    Balanced(BalancedOperator<T>),

    /// Balanced texture operator.
    BalancedTexture(BalancedTextureOperator<T>),
}

macro_rules! dispatch {
    ($self:expr, $op:ident => $body:expr) => {
        match $self {
            Operator::Default($op) => $body,
            Operator::Texture($op) => $body,
            Operator::Balanced($op) => $body,
            Operator::BalancedTexture($op) => $body,
        }
    };
}

impl<T: Float> Operator<T> {
    /// Wrap a core in the variant selected by `interpolation` and `balance`.
    pub(crate) fn from_core(
        core: OperatorCore<T>,
        interpolation: InterpolationType,
        balance_workload: bool,
        processing_order: Array<ProcessingChunk>,
        maximum_payload: usize,
    ) -> Self {
        match OperatorType::select(interpolation, balance_workload) {
            OperatorType::Default => Self::Default(DefaultOperator::new(core)),
            OperatorType::Texture => Self::Texture(TextureOperator::new(core, interpolation)),
            OperatorType::Balanced => {
                Self::Balanced(BalancedOperator::new(core, processing_order, maximum_payload))
            }
            OperatorType::BalancedTexture => Self::BalancedTexture(BalancedTextureOperator::new(
                core,
                interpolation,
                processing_order,
                maximum_payload,
            )),
        }
    }
}

impl<T: Float> GriddingOperator<T> for Operator<T> {
    fn operator_type(&self) -> OperatorType {
        dispatch!(self, op => op.operator_type())
    }

    fn interpolation_type(&self) -> InterpolationType {
        dispatch!(self, op => op.interpolation_type())
    }

    fn core(&self) -> &OperatorCore<T> {
        dispatch!(self, op => op.core())
    }

    fn sector_processing_order(&self) -> Option<&Array<ProcessingChunk>> {
        dispatch!(self, op => op.sector_processing_order())
    }

    fn maximum_payload(&self) -> Option<usize> {
        dispatch!(self, op => op.maximum_payload())
    }

    fn set_sector_processing_order(
        &mut self,
        order: Array<ProcessingChunk>,
    ) -> Result<(), NufftError> {
        dispatch!(self, op => op.set_sector_processing_order(order))
    }
}
