//! Image pool construction.
//!
//! The pool is a concatenation of independently shuffled permutations of the
//! catalog, long enough to give every grid cell an image. Within one
//! permutation no image repeats. Two neighbouring permutations may place the
//! same image on either side of their boundary; nothing here prevents that.

use rand::Rng;

use crate::catalog::ImageResource;
use crate::error::GridError;

/// Ordered sequence of images handed out to grid cells in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePool {
    images: Vec<ImageResource>,
    segment_len: usize,
}

impl ImagePool {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Length of one shuffled permutation (the catalog size)
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Image for the `index`-th cell, wrapping when the pool is shorter.
    pub fn image_for(&self, index: usize) -> Option<&ImageResource> {
        if self.images.is_empty() {
            return None;
        }
        self.images.get(index % self.images.len())
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &ImageResource> {
        self.images.iter()
    }
}

/// Build a pool of at least `min_length` images from `catalog`.
///
/// Returns [`GridError::EmptyCatalog`] when there is nothing to shuffle.
/// A `min_length` of zero yields an empty pool.
pub fn build_pool<R: Rng + ?Sized>(
    catalog: &[ImageResource],
    min_length: usize,
    rng: &mut R,
) -> Result<ImagePool, GridError> {
    if catalog.is_empty() {
        return Err(GridError::EmptyCatalog);
    }

    let segment_len = catalog.len();
    if min_length == 0 {
        return Ok(ImagePool {
            images: Vec::new(),
            segment_len,
        });
    }

    let repetitions = min_length.div_ceil(segment_len);
    let mut images = Vec::with_capacity(repetitions * segment_len);
    for _ in 0..repetitions {
        let mut segment = catalog.to_vec();
        fisher_yates(&mut segment, rng);
        images.extend(segment);
    }

    Ok(ImagePool {
        images,
        segment_len,
    })
}

/// In-place uniform shuffle: walk from the last index down, swapping each
/// slot with a uniformly chosen slot at or before it.
fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn catalog(n: usize) -> Vec<ImageResource> {
        (0..n)
            .map(|i| ImageResource::new(format!("gallery/img_{i:02}.jpg")))
            .collect()
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = build_pool(&[], 10, &mut rng);
        assert_eq!(result, Err(GridError::EmptyCatalog));
    }

    #[test]
    fn test_zero_min_length_gives_empty_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = build_pool(&catalog(5), 0, &mut rng).unwrap();
        assert!(pool.is_empty());
        assert!(pool.image_for(3).is_none());
    }

    #[test]
    fn test_pool_is_long_enough() {
        let mut rng = StdRng::seed_from_u64(7);
        let images = catalog(27);
        for min_length in [1, 26, 27, 28, 56, 100, 500] {
            let pool = build_pool(&images, min_length, &mut rng).unwrap();
            assert!(
                pool.len() >= min_length,
                "pool of {} for min_length {}",
                pool.len(),
                min_length
            );
            assert_eq!(pool.len() % images.len(), 0);
        }
    }

    #[test]
    fn test_first_segment_has_no_duplicates() {
        let images = catalog(27);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = build_pool(&images, 27, &mut rng).unwrap();
            let distinct: HashSet<_> = pool.iter().take(images.len()).collect();
            assert_eq!(distinct.len(), images.len());
        }
    }

    #[test]
    fn test_every_segment_is_a_permutation() {
        let images = catalog(9);
        let mut rng = StdRng::seed_from_u64(42);
        let pool = build_pool(&images, 40, &mut rng).unwrap();
        let expected: HashSet<_> = images.iter().collect();

        let all: Vec<_> = pool.iter().collect();
        for segment in all.chunks(pool.segment_len()) {
            let seen: HashSet<_> = segment.iter().copied().collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_same_seed_same_pool() {
        let images = catalog(12);
        let a = build_pool(&images, 50, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = build_pool(&images, 50, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_segments_are_shuffled_independently() {
        let images = catalog(20);
        let mut rng = StdRng::seed_from_u64(11);
        let pool = build_pool(&images, 60, &mut rng).unwrap();
        let all: Vec<_> = pool.iter().collect();
        let segments: Vec<_> = all.chunks(20).collect();
        // 20! orderings; three identical segments would mean the rng is ignored
        assert!(segments[0] != segments[1] || segments[1] != segments[2]);
    }

    #[test]
    fn test_image_for_wraps() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = build_pool(&catalog(4), 4, &mut rng).unwrap();
        assert_eq!(pool.image_for(1), pool.image_for(5));
    }

    #[test]
    fn test_single_image_catalog() {
        let mut rng = StdRng::seed_from_u64(5);
        let images = catalog(1);
        let pool = build_pool(&images, 3, &mut rng).unwrap();
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|img| *img == images[0]));
    }
}
