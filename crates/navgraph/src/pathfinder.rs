// C3 Pathfinder (spec.md §4.3): single-pair BFS (all edges weight 1) and
// all-pairs Floyd-Warshall over a `NavigationGraph`, plus path->command
// translation.

use crate::error::NavError;
use crate::graph::{NavigationGraph, Via};
use engine_contract::{Action, EntityRef, RoomId, Snapshot};
use std::collections::{HashMap, VecDeque};

/// A concrete room-to-room route: the room sequence plus the edge taken at
/// each hop (needed to translate back into commands).
#[derive(Clone, Debug)]
pub struct Path {
    pub rooms: Vec<RoomId>,
    pub steps: Vec<crate::graph::Edge>,
}

impl Path {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// BFS shortest path; since every edge weighs 1 this is equivalent to A*
/// with a zero heuristic (spec.md §4.3) but simpler. Ties are broken by
/// insertion order: `NavigationGraph::edges_from` preserves the order rules
/// were applied in, and BFS visits them in that order, so the first
/// discovered predecessor for a room is always the lexicographically-first
/// (by construction order) route.
pub fn shortest_path(graph: &NavigationGraph, from: RoomId, to: RoomId) -> Result<Path, NavError> {
    if from == to {
        return Ok(Path { rooms: vec![from], steps: Vec::new() });
    }

    let mut visited = std::collections::HashSet::new();
    let mut queue = VecDeque::new();
    // predecessor[&room] = (room we came from, the edge taken)
    let mut predecessor: HashMap<RoomId, (RoomId, crate::graph::Edge)> = HashMap::new();

    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return Ok(reconstruct(from, to, &predecessor));
        }
        for edge in graph.edges_from(current) {
            if visited.insert(edge.to) {
                predecessor.insert(edge.to, (current, edge.clone()));
                queue.push_back(edge.to);
            }
        }
    }

    if visited.contains(&to) {
        return Ok(reconstruct(from, to, &predecessor));
    }
    Err(NavError::NoPath { from, to })
}

fn reconstruct(from: RoomId, to: RoomId, predecessor: &HashMap<RoomId, (RoomId, crate::graph::Edge)>) -> Path {
    let mut rooms = vec![to];
    let mut steps = Vec::new();
    let mut current = to;
    while current != from {
        let (prev, edge) = predecessor.get(&current).expect("path reconstruction reached an undiscovered room");
        steps.push(edge.clone());
        rooms.push(*prev);
        current = *prev;
    }
    rooms.reverse();
    steps.reverse();
    Path { rooms, steps }
}

/// Distance + next-hop matrices produced by Floyd-Warshall (spec.md §4.3).
/// `dist[u][v] = None` means unreachable (the spec's `∞`).
pub struct DistanceMatrix {
    pub rooms: Vec<RoomId>,
    index: HashMap<RoomId, usize>,
    dist: Vec<Vec<Option<u32>>>,
    next_hop: Vec<Vec<Option<RoomId>>>,
}

impl DistanceMatrix {
    pub fn distance(&self, from: RoomId, to: RoomId) -> Option<u32> {
        let (i, j) = (*self.index.get(&from)?, *self.index.get(&to)?);
        self.dist[i][j]
    }

    /// Reconstructs the shortest room sequence from `from` to `to` using the
    /// next-hop matrix. `None` if unreachable.
    pub fn path(&self, from: RoomId, to: RoomId) -> Option<Vec<RoomId>> {
        let i = *self.index.get(&from)?;
        let j = *self.index.get(&to)?;
        self.dist[i][j]?;
        let mut rooms = vec![from];
        let mut current = from;
        while current != to {
            let idx = *self.index.get(&current)?;
            let next = self.next_hop[idx][j]?;
            rooms.push(next);
            current = next;
        }
        Some(rooms)
    }
}

/// Standard O(V^3) all-pairs shortest paths. Rooms are indexed in the order
/// `NavigationGraph::rooms()` yields them; callers that need a stable tie
/// break (spec.md §8 property 5 / scenario S5) should pass an explicitly
/// sorted room list via `floyd_warshall_ordered`.
pub fn floyd_warshall(graph: &NavigationGraph) -> DistanceMatrix {
    let mut rooms: Vec<RoomId> = graph.rooms().copied().collect();
    rooms.sort_by_key(|r| r.as_str());
    floyd_warshall_ordered(graph, rooms)
}

pub fn floyd_warshall_ordered(graph: &NavigationGraph, rooms: Vec<RoomId>) -> DistanceMatrix {
    let n = rooms.len();
    log::debug!("running floyd-warshall over {n} rooms");
    let index: HashMap<RoomId, usize> = rooms.iter().enumerate().map(|(i, r)| (*r, i)).collect();

    let mut dist = vec![vec![None; n]; n];
    let mut next_hop = vec![vec![None; n]; n];

    for (i, room) in rooms.iter().enumerate() {
        dist[i][i] = Some(0);
        for edge in graph.edges_from(*room) {
            let j = index[&edge.to];
            let better = match dist[i][j] {
                Some(existing) => 1 < existing,
                None => true,
            };
            if better {
                dist[i][j] = Some(1);
                next_hop[i][j] = Some(edge.to);
            }
        }
    }
    for i in 0..n {
        if next_hop[i][i].is_none() && dist[i][i].is_some() {
            next_hop[i][i] = Some(rooms[i]);
        }
    }

    for k in 0..n {
        for i in 0..n {
            let Some(d_ik) = dist[i][k] else { continue };
            for j in 0..n {
                let Some(d_kj) = dist[k][j] else { continue };
                let candidate = d_ik + d_kj;
                let better = match dist[i][j] {
                    Some(existing) => candidate < existing,
                    None => true,
                };
                if better {
                    dist[i][j] = Some(candidate);
                    next_hop[i][j] = next_hop[i][k];
                }
            }
        }
    }

    DistanceMatrix { rooms, index, dist, next_hop }
}

/// Translates a `Path` into the concrete `Action` sequence, per spec.md
/// §4.3: each edge becomes its stored direction (or the teleport's explicit
/// action), with any unmet pre-action requirement emitted first.
pub fn path_to_commands(path: &Path, snapshot: &impl Snapshot) -> Vec<Action> {
    let mut actions = Vec::new();
    for edge in &path.steps {
        if let Some(pre) = &edge.pre_action {
            let satisfied = match pre.satisfied_when {
                Some(flag) => snapshot.flag(EntityRef::Global, flag),
                None => false,
            };
            if !satisfied {
                actions.push(pre.action.clone());
            }
        }
        match &edge.via {
            Via::Direction(direction) => actions.push(Action::Go { direction: *direction }),
            Via::Teleport(action) => actions.push(action.clone()),
        }
    }
    actions
}
