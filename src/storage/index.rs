//! Positional index conversion for key enumeration.
//!
//! Callers coming from loosely typed sources pass negative, fractional or
//! non-finite positions. Those never error: they simply match no key.

/// A value usable as a position in a backend's key enumeration
pub trait StorageIndex {
    /// Zero-based position, or `None` when the value can never match a key
    fn to_index(self) -> Option<usize>;
}

impl StorageIndex for usize {
    fn to_index(self) -> Option<usize> {
        Some(self)
    }
}

impl StorageIndex for u32 {
    fn to_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl StorageIndex for u64 {
    fn to_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl StorageIndex for i32 {
    fn to_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl StorageIndex for i64 {
    fn to_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl StorageIndex for isize {
    fn to_index(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

impl StorageIndex for f64 {
    fn to_index(self) -> Option<usize> {
        if !self.is_finite() {
            return None;
        }
        let truncated = self.trunc();
        if truncated < 0.0 || truncated > usize::MAX as f64 {
            return None;
        }
        Some(truncated as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_indices() {
        assert_eq!(3usize.to_index(), Some(3));
        assert_eq!(3u32.to_index(), Some(3));
        assert_eq!(0i32.to_index(), Some(0));
        assert_eq!((-1i32).to_index(), None);
        assert_eq!((-1i64).to_index(), None);
        assert_eq!(isize::MIN.to_index(), None);
    }

    #[test]
    fn test_float_indices() {
        assert_eq!(2.0f64.to_index(), Some(2));
        assert_eq!(2.9f64.to_index(), Some(2));
        assert_eq!((-0.5f64).to_index(), Some(0));
        assert_eq!((-1.0f64).to_index(), None);
        assert_eq!(f64::INFINITY.to_index(), None);
        assert_eq!(f64::NEG_INFINITY.to_index(), None);
        assert_eq!(f64::NAN.to_index(), None);
        assert_eq!(1e300f64.to_index(), None);
    }
}
