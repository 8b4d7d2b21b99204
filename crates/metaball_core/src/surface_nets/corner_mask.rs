//! Corner mask computation.
//!
//! The corner mask is an 8-bit value where each bit indicates whether a corner
//! of the cell is inside the surface (negative field value).

/// Build corner mask from 8 field samples.
///
/// Each bit in the result corresponds to one corner:
/// - Bit 0: corner (0,0,0)
/// - Bit 1: corner (1,0,0)
/// - Bit 2: corner (0,1,0)
/// - Bit 3: corner (1,1,0)
/// - Bit 4: corner (0,0,1)
/// - Bit 5: corner (1,0,1)
/// - Bit 6: corner (0,1,1)
/// - Bit 7: corner (1,1,1)
#[inline]
pub fn build(samples: &[f32; 8]) -> u8 {
  samples
    .iter()
    .enumerate()
    .fold(0u8, |mask, (i, &s)| if s < 0.0 { mask | (1 << i) } else { mask })
}

/// True if every corner lies on the same side of the surface.
#[inline]
pub fn is_homogeneous(mask: u8) -> bool {
  mask == 0 || mask == 0xFF
}

#[cfg(test)]
#[path = "corner_mask_test.rs"]
mod corner_mask_test;
