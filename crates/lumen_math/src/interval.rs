/// A closed range of real numbers, used to bound valid hit distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.min).min(self.max)
    }

    /// The same interval with its upper bound replaced.
    ///
    /// Used to shrink the search range to the nearest hit found so far.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// The same interval with its lower bound replaced.
    pub fn with_min(&self, min: f64) -> Interval {
        Interval::new(min, self.max)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));

        assert!(!interval.surrounds(-0.1));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 0.999);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(0.5), 0.5);
        assert_eq!(interval.clamp(1.0), 0.999);
    }

    #[test]
    fn test_interval_narrowing() {
        let interval = Interval::new(0.001, f64::INFINITY);
        let narrowed = interval.with_max(4.0);
        assert_eq!(narrowed.min, 0.001);
        assert_eq!(narrowed.max, 4.0);
        assert!(!narrowed.surrounds(4.0));

        let raised = narrowed.with_min(2.0);
        assert_eq!(raised, Interval::new(2.0, 4.0));
    }

    #[test]
    fn test_interval_sentinels() {
        let empty = Interval::EMPTY;
        assert!(empty.min > empty.max);
        assert!(!empty.contains(0.0));
        assert!(!empty.surrounds(f64::INFINITY));
        assert_eq!(Interval::default(), Interval::EMPTY);

        let universe = Interval::UNIVERSE;
        assert!(universe.contains(0.0));
        assert!(universe.contains(1e300));
        assert!(universe.contains(-1e300));
        assert_eq!(universe.size(), f64::INFINITY);
    }
}
