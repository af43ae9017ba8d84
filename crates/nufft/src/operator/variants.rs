//! Concrete operator variants.
//!
//! Each variant wraps an [`OperatorCore`] and adds only its distinguishing
//! state. The shared behaviour lives in the default methods of
//! [`GriddingOperator`].

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::processing_order::{ProcessingChunk, check_processing_order};
use crate::operator::core::OperatorCore;
use crate::operator::{GriddingOperator, InterpolationType, OperatorType};
use crate::primitives::buffer::Array;
use crate::primitives::errors::NufftError;

// ============================================================================
// Default
// ============================================================================

/// Gridding with a precomputed kernel lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultOperator<T> {
    core: OperatorCore<T>,
}

impl<T> DefaultOperator<T> {
    pub(crate) fn new(core: OperatorCore<T>) -> Self {
        Self { core }
    }
}

impl<T: Float> GriddingOperator<T> for DefaultOperator<T> {
    fn operator_type(&self) -> OperatorType {
        OperatorType::Default
    }

    fn interpolation_type(&self) -> InterpolationType {
        InterpolationType::ConstLookup
    }

    fn core(&self) -> &OperatorCore<T> {
        &self.core
    }

    fn sector_processing_order(&self) -> Option<&Array<ProcessingChunk>> {
        None
    }

    fn maximum_payload(&self) -> Option<usize> {
        None
    }

    fn set_sector_processing_order(
        &mut self,
        _order: Array<ProcessingChunk>,
    ) -> Result<(), NufftError> {
        Err(NufftError::UnsupportedFeature {
            target: "Default operator",
            feature: "sector processing order",
        })
    }
}

// ============================================================================
// Texture
// ============================================================================

/// Gridding with texture-memory kernel lookup (1D, 2D or 3D texture).
#[derive(Debug, Clone, PartialEq)]
pub struct TextureOperator<T> {
    core: OperatorCore<T>,
    interpolation: InterpolationType,
}

impl<T> TextureOperator<T> {
    pub(crate) fn new(core: OperatorCore<T>, interpolation: InterpolationType) -> Self {
        Self {
            core,
            interpolation,
        }
    }
}

impl<T: Float> GriddingOperator<T> for TextureOperator<T> {
    fn operator_type(&self) -> OperatorType {
        OperatorType::Texture
    }

    fn interpolation_type(&self) -> InterpolationType {
        self.interpolation
    }

    fn core(&self) -> &OperatorCore<T> {
        &self.core
    }

    fn sector_processing_order(&self) -> Option<&Array<ProcessingChunk>> {
        None
    }

    fn maximum_payload(&self) -> Option<usize> {
        None
    }

    fn set_sector_processing_order(
        &mut self,
        _order: Array<ProcessingChunk>,
    ) -> Result<(), NufftError> {
        Err(NufftError::UnsupportedFeature {
            target: "Texture operator",
            feature: "sector processing order",
        })
    }
}

// ============================================================================
// Balanced
// ============================================================================

/// Lookup-table gridding scheduled over bounded-size sector chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedOperator<T> {
    core: OperatorCore<T>,
    processing_order: Array<ProcessingChunk>,
    maximum_payload: usize,
}

impl<T> BalancedOperator<T> {
    pub(crate) fn new(
        core: OperatorCore<T>,
        processing_order: Array<ProcessingChunk>,
        maximum_payload: usize,
    ) -> Self {
        Self {
            core,
            processing_order,
            maximum_payload,
        }
    }
}

impl<T: Float> GriddingOperator<T> for BalancedOperator<T> {
    fn operator_type(&self) -> OperatorType {
        OperatorType::Balanced
    }

    fn interpolation_type(&self) -> InterpolationType {
        InterpolationType::ConstLookup
    }

    fn core(&self) -> &OperatorCore<T> {
        &self.core
    }

    fn sector_processing_order(&self) -> Option<&Array<ProcessingChunk>> {
        Some(&self.processing_order)
    }

    fn maximum_payload(&self) -> Option<usize> {
        Some(self.maximum_payload)
    }

    fn set_sector_processing_order(
        &mut self,
        order: Array<ProcessingChunk>,
    ) -> Result<(), NufftError> {
        check_processing_order(
            &order.data,
            &self.core.sector_data_count.data,
            self.maximum_payload,
        )?;
        self.processing_order = order;
        Ok(())
    }
}

// ============================================================================
// Balanced Texture
// ============================================================================

/// Texture-lookup gridding scheduled over bounded-size sector chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedTextureOperator<T> {
    core: OperatorCore<T>,
    interpolation: InterpolationType,
    processing_order: Array<ProcessingChunk>,
    maximum_payload: usize,
}

impl<T> BalancedTextureOperator<T> {
    pub(crate) fn new(
        core: OperatorCore<T>,
        interpolation: InterpolationType,
        processing_order: Array<ProcessingChunk>,
        maximum_payload: usize,
    ) -> Self {
        Self {
            core,
            interpolation,
            processing_order,
            maximum_payload,
        }
    }
}

impl<T: Float> GriddingOperator<T> for BalancedTextureOperator<T> {
    fn operator_type(&self) -> OperatorType {
        OperatorType::BalancedTexture
    }

    fn interpolation_type(&self) -> InterpolationType {
        self.interpolation
    }

    fn core(&self) -> &OperatorCore<T> {
        &self.core
    }

    fn sector_processing_order(&self) -> Option<&Array<ProcessingChunk>> {
        Some(&self.processing_order)
    }

    fn maximum_payload(&self) -> Option<usize> {
        Some(self.maximum_payload)
    }

    fn set_sector_processing_order(
        &mut self,
        order: Array<ProcessingChunk>,
    ) -> Result<(), NufftError> {
        check_processing_order(
            &order.data,
            &self.core.sector_data_count.data,
            self.maximum_payload,
        )?;
        self.processing_order = order;
        Ok(())
    }
}
