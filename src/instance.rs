use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// A one-dimensional cutting-stock instance: bars of length `capacity` and
/// item types with a width and a demand each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    name: String,
    capacity: u32,
    widths: Vec<u32>,
    demands: Vec<u32>,
}

impl Instance {
    /// Creates an instance, checking that the data has a consistent shape.
    ///
    /// An item wider than the bar is accepted here; it is reported when the
    /// master problem is built.
    pub fn new(
        name: impl Into<String>,
        capacity: u32,
        widths: Vec<u32>,
        demands: Vec<u32>,
    ) -> Result<Self, Error> {
        if widths.len() != demands.len() {
            return Err(Error::InvalidInstance(format!(
                "{} widths but {} demands",
                widths.len(),
                demands.len()
            )));
        }
        if widths.is_empty() {
            return Err(Error::InvalidInstance("no item types".to_string()));
        }
        if capacity == 0 {
            return Err(Error::InvalidInstance(
                "bar capacity must be positive".to_string(),
            ));
        }
        if let Some(i) = widths.iter().position(|&w| w == 0) {
            return Err(Error::InvalidInstance(format!(
                "item {i} has zero width"
            )));
        }
        Ok(Instance {
            name: name.into(),
            capacity,
            widths,
            demands,
        })
    }

    /// Reads an instance from a file in the plain-text format (see [`Instance::from_str`]).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    /// Returns the instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of item types.
    pub fn n_items(&self) -> usize {
        self.widths.len()
    }

    /// Returns the bar capacity `W`.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the item widths.
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Returns the item demands.
    pub fn demands(&self) -> &[u32] {
        &self.demands
    }

    /// Returns `floor(W / w_i)`, the most copies of item `i` one bar can hold.
    pub fn max_copies(&self, item: usize) -> u32 {
        self.capacity / self.widths[item]
    }

    /// Returns `Σ w_i d_i`.
    pub fn total_size(&self) -> u64 {
        self.widths
            .iter()
            .zip(&self.demands)
            .map(|(&w, &d)| u64::from(w) * u64::from(d))
            .sum()
    }

    /// Returns `ceil(Σ w_i d_i / W)`, the number of bars the material alone needs.
    pub fn material_bound(&self) -> u64 {
        self.total_size().div_ceil(u64::from(self.capacity))
    }

    /// Returns the first item that does not fit in an empty bar, if any.
    pub fn oversized_item(&self) -> Option<usize> {
        (0..self.n_items()).find(|&i| self.max_copies(i) == 0)
    }

    /// Fails with [`Error::ItemDoesNotFit`] if some item is wider than the bar.
    pub fn check_items_fit(&self) -> Result<(), Error> {
        match self.oversized_item() {
            Some(item) => Err(Error::ItemDoesNotFit {
                item,
                width: self.widths[item],
                capacity: self.capacity,
            }),
            None => Ok(()),
        }
    }
}

/// Parses the plain-text format: the instance name, the number of item
/// types `n`, the bar capacity `W`, then `n` pairs `width demand`. All
/// tokens are whitespace-delimited.
impl FromStr for Instance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut tokens = s.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| Error::Parse("missing instance name".to_string()))?;
        let n: usize = next_number(&mut tokens, "item count")?;
        let capacity: u32 = next_number(&mut tokens, "bar capacity")?;

        // n is untrusted; every item needs at least two tokens
        let mut widths = Vec::with_capacity(n.min(s.len() / 2));
        let mut demands = Vec::with_capacity(n.min(s.len() / 2));
        for i in 0..n {
            widths.push(next_number(&mut tokens, &format!("width of item {i}"))?);
            demands.push(next_number(&mut tokens, &format!("demand of item {i}"))?);
        }
        if let Some(extra) = tokens.next() {
            return Err(Error::Parse(format!(
                "unexpected token {extra:?} after {n} items"
            )));
        }

        Instance::new(name, capacity, widths, demands)
    }
}

fn next_number<'a, T, I>(tokens: &mut I, what: &str) -> Result<T, Error>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| Error::Parse(format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| Error::Parse(format!("{what} is not a non-negative integer: {token:?}")))
}

impl fmt::Display for Instance {
    /// Writes the instance back in the plain-text format.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.n_items())?;
        writeln!(f, "{}", self.capacity)?;
        for (w, d) in self.widths.iter().zip(&self.demands) {
            writeln!(f, "{w} {d}")?;
        }
        Ok(())
    }
}
