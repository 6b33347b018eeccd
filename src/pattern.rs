use std::fmt;
use std::ops::Index;

use crate::instance::Instance;

/// A way to cut one bar: `self[i]` copies of item type `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern(pub Vec<u32>);

impl Pattern {
    /// The single-item pattern holding `floor(W / w_item)` copies of `item` and nothing else.
    pub fn trivial(instance: &Instance, item: usize) -> Self {
        let mut counts = vec![0; instance.n_items()];
        counts[item] = instance.max_copies(item);
        Pattern(counts)
    }

    /// Returns `Σ w_i a_i`.
    pub fn width(&self, instance: &Instance) -> u64 {
        self.0
            .iter()
            .zip(instance.widths())
            .map(|(&a, &w)| u64::from(a) * u64::from(w))
            .sum()
    }

    /// Returns true if the pattern has one entry per item type and fits in a bar.
    pub fn fits(&self, instance: &Instance) -> bool {
        self.0.len() == instance.n_items() && self.width(instance) <= u64::from(instance.capacity())
    }

    /// Returns the dual-weighted value `Σ π_i a_i`.
    pub fn value(&self, duals: &[f64]) -> f64 {
        self.0
            .iter()
            .zip(duals)
            .map(|(&a, &pi)| f64::from(a) * pi)
            .sum()
    }

    /// Iterates over `(item, count)` for the items the pattern actually cuts.
    pub fn nonzeros(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, a)| a > 0)
    }
}

impl Index<usize> for Pattern {
    type Output = u32;

    fn index(&self, item: usize) -> &u32 {
        &self.0[item]
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, a) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance::new("p", 10, vec![3, 4], vec![5, 4]).unwrap()
    }

    #[test]
    fn trivial_patterns() {
        let inst = instance();
        assert_eq!(Pattern::trivial(&inst, 0), Pattern(vec![3, 0]));
        assert_eq!(Pattern::trivial(&inst, 1), Pattern(vec![0, 2]));
        assert!(Pattern::trivial(&inst, 0).fits(&inst));
        assert!(Pattern::trivial(&inst, 1).fits(&inst));
    }

    #[test]
    fn width_and_fit() {
        let inst = instance();
        let mixed = Pattern(vec![2, 1]);
        assert_eq!(mixed.width(&inst), 10);
        assert!(mixed.fits(&inst));
        assert!(!Pattern(vec![2, 2]).fits(&inst));
        assert!(!Pattern(vec![1]).fits(&inst));
    }

    #[test]
    fn dual_value() {
        let p = Pattern(vec![2, 1]);
        assert!((p.value(&[0.25, 0.5]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nonzeros_skip_empty_items() {
        let p = Pattern(vec![0, 3, 0, 1]);
        assert_eq!(p.nonzeros().collect::<Vec<_>>(), vec![(1, 3), (3, 1)]);
        assert_eq!(p[1], 3);
    }

    #[test]
    fn display() {
        assert_eq!(Pattern(vec![2, 0, 1]).to_string(), "[2, 0, 1]");
        assert_eq!(Pattern::default().to_string(), "[]");
    }
}
