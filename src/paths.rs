//! Candidate route enumeration.
//!
//! Every visiting order of the needed warehouses that begins at a given start
//! becomes one [`Route`]. The number of routes is `(k - 1)!` for `k` needed
//! warehouses, so callers bound `k` before enumerating (see
//! [`routes_per_start`]).

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::domain::{LocationIdx, Route};

/// Routes [`enumerate_routes`] yields for one start that belongs to a needed
/// set of `needed` warehouses, or `None` on overflow.
///
/// An empty needed set yields one direct route.
///
/// # Examples
///
/// ```
/// use warehouse_routing::paths::routes_per_start;
///
/// assert_eq!(routes_per_start(0), Some(1));
/// assert_eq!(routes_per_start(1), Some(1));
/// assert_eq!(routes_per_start(4), Some(6));
/// assert_eq!(routes_per_start(9), Some(40_320));
/// assert_eq!(routes_per_start(200), None);
/// ```
pub fn routes_per_start(needed: usize) -> Option<usize> {
    (1..needed).try_fold(1usize, |acc, n| acc.checked_mul(n))
}

/// Enumerates every route that starts at `start`, visits each warehouse in
/// `needed` exactly once and ends at `delivery`.
///
/// Orders are produced lexicographically by warehouse index. A `start` that is
/// not needed yields nothing, except for an empty needed set, where every
/// start yields the single direct route `start -> delivery`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use warehouse_routing::domain::Edge;
/// use warehouse_routing::paths::enumerate_routes;
///
/// let needed: BTreeSet<usize> = [0, 1, 2].into_iter().collect();
/// let routes: Vec<_> = enumerate_routes(1, &needed, 3).collect();
/// assert_eq!(routes.len(), 2);
/// assert_eq!(
///     routes[0].edges(),
///     &[Edge::new(1, 0), Edge::new(0, 2), Edge::new(2, 3)]
/// );
///
/// assert_eq!(enumerate_routes(2, &[0].into_iter().collect(), 3).count(), 0);
/// ```
pub fn enumerate_routes(
    start: LocationIdx,
    needed: &BTreeSet<LocationIdx>,
    delivery: LocationIdx,
) -> impl Iterator<Item = Route> {
    let eligible = needed.is_empty() || needed.contains(&start);
    let rest: Vec<LocationIdx> = needed.iter().copied().filter(|&w| w != start).collect();
    let k = rest.len();

    eligible
        .then(move || {
            rest.into_iter().permutations(k).map(move |tail| {
                let mut stops = Vec::with_capacity(tail.len() + 1);
                stops.push(start);
                stops.extend(tail);
                Route::from_stops(&stops, delivery)
            })
        })
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Edge;

    fn set(items: &[LocationIdx]) -> BTreeSet<LocationIdx> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_single_needed_warehouse_gives_direct_route() {
        let routes: Vec<_> = enumerate_routes(0, &set(&[0]), 3).collect();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].edges(), &[Edge::new(0, 3)]);
    }

    #[test]
    fn test_empty_needed_gives_direct_route_from_any_start() {
        for start in 0..3 {
            let routes: Vec<_> = enumerate_routes(start, &set(&[]), 3).collect();
            assert_eq!(routes.len(), 1);
            assert_eq!(routes[0].edges(), &[Edge::new(start, 3)]);
        }
    }

    #[test]
    fn test_start_outside_needed_set_yields_nothing() {
        assert_eq!(enumerate_routes(2, &set(&[0, 1]), 3).count(), 0);
    }

    #[test]
    fn test_routes_visit_every_needed_warehouse_once() {
        let needed = set(&[0, 1, 2, 3]);
        let delivery = 5;
        for start in 0..5 {
            let routes: Vec<_> = enumerate_routes(start, &needed, delivery).collect();
            if !needed.contains(&start) {
                assert!(routes.is_empty());
                continue;
            }
            assert_eq!(Some(routes.len()), routes_per_start(needed.len()));
            for route in &routes {
                let stops: Vec<_> = route.stops().collect();
                assert_eq!(stops[0], start);
                assert_eq!(stops.iter().copied().collect::<BTreeSet<_>>(), needed);
                assert_eq!(stops.len(), needed.len());
                assert_eq!(route.edges().last().map(|e| e.to), Some(delivery));
                for pair in route.edges().windows(2) {
                    assert_eq!(pair[0].to, pair[1].from);
                }
            }
        }
    }

    #[test]
    fn test_orders_are_lexicographic() {
        let orders: Vec<Vec<LocationIdx>> = enumerate_routes(0, &set(&[0, 1, 2]), 9)
            .map(|r| r.stops().collect())
            .collect();
        assert_eq!(orders, vec![vec![0, 1, 2], vec![0, 2, 1]]);
    }
}
