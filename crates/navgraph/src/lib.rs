//! C2 Graph Builder + C3 Pathfinder (spec.md §4.2-§4.3).

pub mod error;
pub mod graph;
pub mod pathfinder;

pub use error::NavError;
pub use graph::{build_graph, Edge, FlagBudget, NavigationGraph, Via};
pub use pathfinder::{floyd_warshall, floyd_warshall_ordered, path_to_commands, shortest_path, DistanceMatrix, Path};
