//! Fixed-Point Arithmetic Unit.
//!
//! This module implements the numeric contracts of the convolution datapath.
//! All values are signed two's complement:
//! - weights are Q2.14 (`i16`),
//! - activations, outputs, and the bias are Q9.7 (`i16`),
//! - partial sums are Q16.16 (`i32`).
//!
//! Every function is total: overflow saturates instead of wrapping or panicking.

use crate::common::Vector;
use crate::common::constants::{ACT_FRAC_BITS, PSUM_FRAC_BITS, WEIGHT_FRAC_BITS};

/// Shift taking a weight-times-activation product (Q11.21) to the partial-sum format.
const PRODUCT_SHIFT: u32 = WEIGHT_FRAC_BITS + ACT_FRAC_BITS - PSUM_FRAC_BITS;

/// Shift between the activation and partial-sum formats.
const WIDEN_SHIFT: u32 = PSUM_FRAC_BITS - ACT_FRAC_BITS;

/// Fixed-point arithmetic unit for the convolution datapath.
#[derive(Debug)]
pub struct FixedPoint;

impl FixedPoint {
    /// Multiply-accumulate of one weight and one activation into a partial sum.
    ///
    /// The product is shifted right arithmetically (floor) into Q16.16 and added
    /// with saturation.
    ///
    /// # Arguments
    ///
    /// * `psum` - Running partial sum (Q16.16).
    /// * `weight` - Weight (Q2.14).
    /// * `act` - Activation (Q9.7).
    ///
    /// # Examples
    ///
    /// ```
    /// use hlscnn_core::core::units::fixed::FixedPoint;
    ///
    /// // 1.0 (Q2.14) * 2.0 (Q9.7) = 2.0 (Q16.16)
    /// assert_eq!(FixedPoint::mac(0, 1 << 14, 2 << 7), 2 << 16);
    /// ```
    pub fn mac(psum: i32, weight: i16, act: i16) -> i32 {
        let product = i32::from(weight) * i32::from(act);
        psum.saturating_add(product >> PRODUCT_SHIFT)
    }

    /// Sum of lane-wise MACs over one weight and one activation vector.
    pub fn dot(psum: i32, weights: &Vector, acts: &Vector) -> i32 {
        weights
            .iter()
            .zip(acts)
            .fold(psum, |acc, (&w, &a)| Self::mac(acc, w, a))
    }

    /// Narrows a partial sum to an activation, flooring and saturating to 16 bits.
    pub fn psum_to_act(psum: i32) -> i16 {
        (psum >> WIDEN_SHIFT).clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }

    /// Widens an activation to the partial-sum format (exact).
    pub fn act_to_psum(act: i16) -> i32 {
        i32::from(act) << WIDEN_SHIFT
    }

    /// Adds two activations in the partial-sum domain.
    pub fn act_add(a: i16, b: i16) -> i32 {
        Self::act_to_psum(a).saturating_add(Self::act_to_psum(b))
    }

    /// Adds a Q9.7 bias to a partial sum.
    pub fn bias_add(psum: i32, bias: i16) -> i32 {
        psum.saturating_add(Self::act_to_psum(bias))
    }

    /// Rectified linear unit in the partial-sum domain.
    pub fn relu(psum: i32) -> i32 {
        psum.max(0)
    }
}
