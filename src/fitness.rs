//! Fitness evaluation.
//!
//! Every solver ranks candidates with [`evaluate`], so results from the exact,
//! greedy and genetic solvers are directly comparable.

use crate::instance::VrpInstance;

/// Travel distance of a single route: depot, each customer in order, back to depot.
/// An empty route costs nothing.
pub fn route_cost(route: &[usize], instance: &VrpInstance) -> f64 {
    let (first, last) = match (route.first(), route.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return 0.0,
    };

    let depot = instance.depot;
    let mut cost = instance.distance(depot, first);
    for leg in route.windows(2) {
        cost += instance.distance(leg[0], leg[1]);
    }
    cost + instance.distance(last, depot)
}

/// Total travel distance of a set of routes.
pub fn evaluate<R: AsRef<[usize]>>(routes: &[R], instance: &VrpInstance) -> f64 {
    routes.iter().map(|r| route_cost(r.as_ref(), instance)).sum()
}
