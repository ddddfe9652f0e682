//! Problem instances for the Vehicle Routing Problem.
//!
//! An instance is a fixed set of 2-D locations where one index is the depot
//! and every other index is a customer. Distances are Euclidean and
//! precomputed once, since every solver queries them in its inner loop.

use crate::error::{Result, VrpError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Location { x, y }
    }
}

impl From<(f64, f64)> for Location {
    fn from((x, y): (f64, f64)) -> Self {
        Location { x, y }
    }
}

/// Euclidean distance between two locations.
#[inline]
pub fn distance(a: &Location, b: &Location) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Represents a complete VRP instance
#[derive(Debug, Clone, Serialize)]
pub struct VrpInstance {
    /// Name of the instance
    pub name: String,
    /// All locations, depot included
    pub locations: Vec<Location>,
    /// Index of the depot in `locations`
    pub depot: usize,
    /// Precomputed distance matrix
    #[serde(skip)]
    distance_matrix: Vec<Vec<f64>>,
}

impl VrpInstance {
    /// Build an instance whose depot is `locations[0]`.
    pub fn new(name: impl Into<String>, locations: Vec<Location>) -> Result<Self> {
        if locations.is_empty() {
            return Err(VrpError::invalid_instance("an instance needs at least the depot location"));
        }
        if let Some(idx) = locations.iter().position(|l| !l.x.is_finite() || !l.y.is_finite()) {
            return Err(VrpError::invalid_instance(format!(
                "location {} has a non-finite coordinate",
                idx
            )));
        }

        let distance_matrix = Self::compute_distance_matrix(&locations);

        Ok(VrpInstance {
            name: name.into(),
            locations,
            depot: 0,
            distance_matrix,
        })
    }

    /// Build an instance from plain `(x, y)` pairs, depot first.
    pub fn from_coords(name: impl Into<String>, coords: &[(f64, f64)]) -> Result<Self> {
        Self::new(name, coords.iter().copied().map(Location::from).collect())
    }

    /// Generate `customer_count + 1` uniformly random points in the unit square.
    /// Index 0 is the depot.
    pub fn random<R: Rng + ?Sized>(customer_count: usize, rng: &mut R) -> Self {
        let locations: Vec<Location> = (0..=customer_count)
            .map(|_| Location::new(rng.gen::<f64>(), rng.gen::<f64>()))
            .collect();
        let distance_matrix = Self::compute_distance_matrix(&locations);

        VrpInstance {
            name: format!("random-{}", customer_count),
            locations,
            depot: 0,
            distance_matrix,
        }
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(locations: &[Location]) -> Vec<Vec<f64>> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance(&locations[i], &locations[j]);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        matrix
    }

    /// Get the distance between two location indices
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_matrix[i][j]
    }

    /// Total number of locations, depot included
    pub fn dimension(&self) -> usize {
        self.locations.len()
    }

    /// Get the number of customers (excluding depot)
    pub fn num_customers(&self) -> usize {
        self.locations.len() - 1
    }

    /// All customer indices in ascending order
    pub fn customers(&self) -> Vec<usize> {
        (0..self.locations.len()).filter(|&i| i != self.depot).collect()
    }

    /// Check that `customers` is a non-empty set of distinct, non-depot indices.
    pub fn check_customers(&self, customers: &[usize]) -> Result<()> {
        if customers.is_empty() {
            return Err(VrpError::invalid_instance("at least one customer is required"));
        }

        let mut seen = HashSet::with_capacity(customers.len());
        for &c in customers {
            if c == self.depot {
                return Err(VrpError::invalid_instance(format!("customer list contains the depot ({})", c)));
            }
            if c >= self.locations.len() {
                return Err(VrpError::invalid_instance(format!(
                    "customer {} is out of range (instance has {} locations)",
                    c,
                    self.locations.len()
                )));
            }
            if !seen.insert(c) {
                return Err(VrpError::invalid_instance(format!("customer {} appears twice", c)));
            }
        }

        Ok(())
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut distances: Vec<f64> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        let customers = self.customers();
        let avg_depot_distance = if customers.is_empty() {
            0.0
        } else {
            customers.iter().map(|&c| self.distance(self.depot, c)).sum::<f64>() / customers.len() as f64
        };

        InstanceStatistics {
            name: self.name.clone(),
            num_customers: customers.len(),
            avg_distance,
            max_distance,
            avg_depot_distance,
        }
    }
}

/// Statistics about a VRP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub num_customers: usize,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub avg_depot_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Locations: {} (1 depot + {} customers)", self.num_customers + 1, self.num_customers)?;
        writeln!(f, "  Avg distance: {:.4}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.4}", self.max_distance)?;
        writeln!(f, "  Avg depot distance: {:.4}", self.avg_depot_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_distance_calculation() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3.0, 4.0);

        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(distance(&b, &a), 5.0);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_matrix_matches_distance() {
        let instance = VrpInstance::from_coords("m", &[(0.0, 0.0), (3.0, 4.0), (-1.5, 2.25)]).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let expected = distance(&instance.locations[i], &instance.locations[j]);
                assert_eq!(instance.distance(i, j), expected);
            }
        }
    }

    #[test]
    fn test_random_instance_in_unit_square() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let instance = VrpInstance::random(12, &mut rng);

        assert_eq!(instance.dimension(), 13);
        assert_eq!(instance.num_customers(), 12);
        assert_eq!(instance.depot, 0);
        assert_eq!(instance.customers(), (1..=12).collect::<Vec<_>>());
        assert!(instance
            .locations
            .iter()
            .all(|l| (0.0..1.0).contains(&l.x) && (0.0..1.0).contains(&l.y)));
    }

    #[test]
    fn test_random_instance_is_reproducible() {
        let a = VrpInstance::random(5, &mut ChaCha8Rng::seed_from_u64(3));
        let b = VrpInstance::random(5, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a.locations, b.locations);
    }

    #[test]
    fn test_rejects_bad_locations() {
        assert!(matches!(VrpInstance::new("empty", vec![]), Err(VrpError::InvalidInstance(_))));
        assert!(matches!(
            VrpInstance::from_coords("nan", &[(0.0, 0.0), (f64::NAN, 1.0)]),
            Err(VrpError::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_check_customers() {
        let instance = VrpInstance::from_coords("c", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();

        assert!(instance.check_customers(&[1, 2]).is_ok());
        assert!(instance.check_customers(&[]).is_err());
        assert!(instance.check_customers(&[0, 1]).is_err());
        assert!(instance.check_customers(&[1, 3]).is_err());
        assert!(instance.check_customers(&[2, 2]).is_err());
    }
}
