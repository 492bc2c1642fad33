// TSP heuristic of spec.md §4.5 step 3: nearest-neighbor seeded at the
// start room, refined by 2-opt local search capped at 100 iterations or
// until no improving swap exists. Ties broken by index-lexicographic order.

use engine_contract::RoomId;

const MAX_TWO_OPT_ITERATIONS: usize = 100;

/// Total length of a route visiting `stops` in order, starting implicitly
/// from whatever room preceded `stops[0]` in the caller's context (callers
/// pass `start` explicitly via `route_length_from`).
pub fn route_length(stops: &[RoomId], distance: impl Fn(RoomId, RoomId) -> Option<u32>) -> u32 {
    stops.windows(2).map(|w| distance(w[0], w[1]).unwrap_or(u32::MAX / 2)).sum()
}

fn route_length_from(start: RoomId, stops: &[RoomId], distance: &impl Fn(RoomId, RoomId) -> Option<u32>) -> u32 {
    if stops.is_empty() {
        return 0;
    }
    let mut total = distance(start, stops[0]).unwrap_or(u32::MAX / 2);
    total = total.saturating_add(route_length(stops, distance));
    total
}

/// Nearest-neighbor construction seeded at `start`: repeatedly visits the
/// closest unvisited stop. Ties broken by index-lexicographic order (the
/// earliest-indexed stop among equal distances wins), per spec.md §4.5.
pub fn nearest_neighbor(start: RoomId, stops: &[RoomId], distance: &impl Fn(RoomId, RoomId) -> Option<u32>) -> Vec<RoomId> {
    let mut remaining: Vec<usize> = (0..stops.len()).collect();
    let mut route = Vec::with_capacity(stops.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_pos = 0;
        let mut best_dist = u32::MAX;
        for (pos, &idx) in remaining.iter().enumerate() {
            let d = distance(current, stops[idx]).unwrap_or(u32::MAX);
            if d < best_dist {
                best_dist = d;
                best_idx = idx;
                best_pos = pos;
            }
        }
        remaining.remove(best_pos);
        route.push(stops[best_idx]);
        current = stops[best_idx];
    }
    route
}

/// 2-opt local search: repeatedly reverses a segment if doing so shortens
/// the route, until a fixed point or `MAX_TWO_OPT_ITERATIONS` is reached
/// (spec.md §4.5, §8 property 4).
pub fn two_opt(start: RoomId, route: &[RoomId], distance: &impl Fn(RoomId, RoomId) -> Option<u32>) -> Vec<RoomId> {
    let mut route = route.to_vec();
    if route.len() < 3 {
        return route;
    }

    for _ in 0..MAX_TWO_OPT_ITERATIONS {
        let mut improved = false;
        let n = route.len();
        'search: for i in 0..n - 1 {
            for j in (i + 1)..n {
                let mut candidate = route.clone();
                candidate[i..=j].reverse();
                let before = route_length_from(start, &route, distance);
                let after = route_length_from(start, &candidate, distance);
                if after < before {
                    route = candidate;
                    improved = true;
                    break 'search;
                }
            }
        }
        if !improved {
            break;
        }
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn grid_distances() -> (RoomId, Vec<RoomId>, HashMap<(RoomId, RoomId), u32>) {
        let start = RoomId::new("start");
        let a = RoomId::new("a");
        let b = RoomId::new("b");
        let c = RoomId::new("c");
        let mut d = HashMap::new();
        // A crossed route start->a->b->c is longer than start->a->c->b if
        // b and c are swapped; simple line topology here for determinism.
        let pts = [(start, 0i32), (a, 1), (b, 3), (c, 2)];
        for &(p, pp) in &pts {
            for &(q, qp) in &pts {
                d.insert((p, q), (pp - qp).unsigned_abs());
            }
        }
        (start, vec![a, b, c], d)
    }

    #[test]
    fn nearest_neighbor_picks_closest_each_step() {
        let (start, stops, d) = grid_distances();
        let dist = |p: RoomId, q: RoomId| d.get(&(p, q)).copied();
        let route = nearest_neighbor(start, &stops, &dist);
        assert_eq!(route[0], RoomId::new("a")); // distance 1, closest to start
    }

    #[test]
    fn two_opt_is_a_fixed_point_no_improving_reversal_remains() {
        let (start, stops, d) = grid_distances();
        let dist = |p: RoomId, q: RoomId| d.get(&(p, q)).copied();
        let nn_route = nearest_neighbor(start, &stops, &dist);
        let optimized = two_opt(start, &nn_route, &dist);

        let n = optimized.len();
        let before = route_length_from(start, &optimized, &dist);
        for i in 0..n - 1 {
            for j in (i + 1)..n {
                let mut candidate = optimized.clone();
                candidate[i..=j].reverse();
                let after = route_length_from(start, &candidate, &dist);
                assert!(after >= before, "found an improving 2-opt swap after convergence");
            }
        }
    }
}
