//! Slices a tall canvas into A4-proportioned page bands.

use std::num::NonZeroU32;

/// A4 sheet in millimetres.
pub const A4_WIDTH_MM: u32 = 210;
pub const A4_HEIGHT_MM: u32 = 297;

/// Vertical slice of the canvas placed on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBand {
    pub index: usize,
    pub top: u32,
    pub height: u32,
}

/// Page height in canvas pixels when the canvas width spans an A4 page.
pub fn a4_page_height(canvas_width: u32) -> NonZeroU32 {
    let height = (u64::from(canvas_width) * u64::from(A4_HEIGHT_MM) + u64::from(A4_WIDTH_MM) / 2)
        / u64::from(A4_WIDTH_MM);
    u32::try_from(height)
        .ok()
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN)
}

/// Cut `total_height` pixels into consecutive bands of `page_height`.
///
/// Produces `ceil(total_height / page_height)` bands, the last one possibly
/// shorter. An empty canvas still yields a single blank page.
pub fn paginate(total_height: u32, page_height: NonZeroU32) -> Vec<PageBand> {
    let page_height = page_height.get();
    if total_height == 0 {
        return vec![PageBand {
            index: 0,
            top: 0,
            height: 0,
        }];
    }

    let mut bands = Vec::with_capacity(total_height.div_ceil(page_height) as usize);
    let mut top = 0;
    while top < total_height {
        let height = page_height.min(total_height - top);
        bands.push(PageBand {
            index: bands.len(),
            top,
            height,
        });
        top += height;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(h: u32) -> NonZeroU32 {
        NonZeroU32::new(h).unwrap()
    }

    #[test]
    fn a4_height_for_double_scale_canvas() {
        assert_eq!(a4_page_height(1588).get(), 2246);
        assert_eq!(a4_page_height(210).get(), 297);
    }

    #[test]
    fn a4_height_never_zero() {
        assert_eq!(a4_page_height(0).get(), 1);
    }

    #[test]
    fn shorter_than_a_page() {
        assert_eq!(
            paginate(100, page(2246)),
            vec![PageBand {
                index: 0,
                top: 0,
                height: 100
            }]
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_blank_page() {
        let bands = paginate(2 * 2246, page(2246));
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1].top, 2246);
        assert_eq!(bands[1].height, 2246);
    }

    #[test]
    fn one_pixel_over_adds_a_page() {
        let bands = paginate(2247, page(2246));
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[1].height, 1);
    }

    #[test]
    fn empty_canvas_gets_one_page() {
        assert_eq!(paginate(0, page(2246)).len(), 1);
    }

    proptest! {
        #[test]
        fn prop_page_count_is_ceiling(h in 1u32..5_000_000, p in 500u32..10_000) {
            let bands = paginate(h, page(p));
            prop_assert_eq!(bands.len() as u32, h.div_ceil(p));
            prop_assert!(!bands.is_empty());
        }

        #[test]
        fn prop_bands_tile_the_canvas(h in 1u32..50_000, p in 1u32..5_000) {
            let bands = paginate(h, page(p));
            let mut expected_top = 0;
            for (i, band) in bands.iter().enumerate() {
                prop_assert_eq!(band.index, i);
                prop_assert_eq!(band.top, expected_top);
                prop_assert!(band.height >= 1 && band.height <= p);
                expected_top += band.height;
            }
            prop_assert_eq!(expected_top, h);
        }
    }
}
