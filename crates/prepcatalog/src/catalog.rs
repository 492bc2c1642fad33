// C4: the static Prep Catalog, its derived dependency graph, and the
// queries the Route Optimizer (C5) and Reactive Planner (C6) run against
// it (spec.md §4.4).

use crate::error::PrepError;
use crate::types::{PrepAction, PrepId, Requirement};
use engine_contract::{EntityRef, FlagName, ObjectId, Snapshot};
use std::collections::{HashMap, HashSet, VecDeque};

/// Static, authored-once data: every prep the game-specific catalog knows
/// about, plus which flags each treasure needs before it can be legally
/// collected/deposited. Built once at startup (spec.md §3's Lifecycles) and
/// passed by reference thereafter.
#[derive(Clone, Debug, Default)]
pub struct PrepCatalog {
    preps: Vec<PrepAction>,
    index: HashMap<PrepId, usize>,
    treasure_requirements: HashMap<ObjectId, HashSet<FlagName>>,
}

impl PrepCatalog {
    pub fn builder() -> PrepCatalogBuilder {
        PrepCatalogBuilder::default()
    }

    pub fn get(&self, id: &PrepId) -> Option<&PrepAction> {
        self.index.get(id).map(|&i| &self.preps[i])
    }

    pub fn all(&self) -> impl Iterator<Item = &PrepAction> {
        self.preps.iter()
    }

    /// Preps whose effect (immediate or delayed) sets `flag`, insertion
    /// order preserved.
    fn preps_producing(&self, flag: FlagName) -> Vec<&PrepAction> {
        self.preps.iter().filter(|p| p.produces(flag)).collect()
    }

    /// Every prep required (directly or transitively) to make `treasure`
    /// collectible, per spec.md §4.4's `preps_for_treasure`. Not sorted;
    /// callers that need ordering use `topological_order` over the result.
    pub fn preps_for_treasure(&self, treasure: ObjectId) -> Vec<PrepId> {
        let Some(required_flags) = self.treasure_requirements.get(&treasure) else {
            return Vec::new();
        };
        let mut closed: HashSet<PrepId> = HashSet::new();
        let mut frontier: Vec<PrepId> = Vec::new();

        for &flag in required_flags {
            for prep in self.preps_producing(flag) {
                if closed.insert(prep.id.clone()) {
                    frontier.push(prep.id.clone());
                }
            }
        }

        while let Some(id) = frontier.pop() {
            let prep = self.get(&id).expect("closure only holds ids from this catalog");
            for req in &prep.requires {
                if let Requirement::Flag(flag) = req {
                    for dep in self.preps_producing(*flag) {
                        if closed.insert(dep.id.clone()) {
                            frontier.push(dep.id.clone());
                        }
                    }
                }
            }
        }

        // Preserve catalog insertion order for determinism.
        self.preps.iter().map(|p| p.id.clone()).filter(|id| closed.contains(id)).collect()
    }

    /// Union of `preps_for_treasure` over every treasure in `treasures`,
    /// topologically sorted (spec.md §4.4).
    pub fn preps_for_treasures(&self, treasures: impl IntoIterator<Item = ObjectId>) -> Result<Vec<PrepId>, PrepError> {
        let mut union: Vec<PrepId> = Vec::new();
        let mut seen = HashSet::new();
        for t in treasures {
            for id in self.preps_for_treasure(t) {
                if seen.insert(id.clone()) {
                    union.push(id);
                }
            }
        }
        let graph = PrepDependencyGraph::build(self)?;
        Ok(graph.topological_subset(&union))
    }

    /// Subset of `preps_for_treasure(treasure)` whose produced flag is not
    /// yet set in `S` (spec.md §4.4's `missing_preps`).
    pub fn missing_preps(&self, snapshot: &impl Snapshot, treasure: ObjectId) -> Vec<PrepId> {
        self.preps_for_treasure(treasure)
            .into_iter()
            .filter(|id| {
                let prep = self.get(id).expect("preps_for_treasure only returns known ids");
                !prep_already_satisfied(prep, snapshot)
            })
            .collect()
    }

    /// Every prep whose `requires` set is fully satisfied in `S` right now
    /// (spec.md §4.4's `ready_preps`).
    pub fn ready_preps(&self, snapshot: &impl Snapshot) -> Vec<PrepId> {
        self.preps
            .iter()
            .filter(|p| requirements_met(p, snapshot))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Partitions the catalog into dependency levels: level 0 has no deps,
    /// level N depends only on levels < N (spec.md §4.4's `prep_levels`).
    pub fn prep_levels(&self) -> Result<Vec<Vec<PrepId>>, PrepError> {
        let graph = PrepDependencyGraph::build(self)?;
        Ok(graph.levels())
    }
}

fn prep_already_satisfied(prep: &PrepAction, snapshot: &impl Snapshot) -> bool {
    prep.effect.immediate_flags.iter().all(|f| snapshot.flag(EntityRef::Global, *f))
        && prep.effect.delayed.map(|(f, _)| snapshot.flag(EntityRef::Global, f)).unwrap_or(true)
}

fn requirements_met(prep: &PrepAction, snapshot: &impl Snapshot) -> bool {
    prep.requires.iter().all(|req| match req {
        Requirement::Item(obj) => snapshot.inventory_all().contains(obj),
        Requirement::Flag(flag) => snapshot.flag(EntityRef::Global, *flag),
    })
}

#[derive(Default)]
pub struct PrepCatalogBuilder {
    preps: Vec<PrepAction>,
    treasure_requirements: HashMap<ObjectId, HashSet<FlagName>>,
}

impl PrepCatalogBuilder {
    pub fn prep(mut self, prep: PrepAction) -> Self {
        self.preps.push(prep);
        self
    }

    pub fn treasure_requires(mut self, treasure: ObjectId, flags: impl IntoIterator<Item = FlagName>) -> Self {
        self.treasure_requirements.entry(treasure).or_default().extend(flags);
        self
    }

    pub fn build(self) -> Result<PrepCatalog, PrepError> {
        let mut index = HashMap::new();
        for (i, prep) in self.preps.iter().enumerate() {
            index.insert(prep.id.clone(), i);
        }
        let count = self.preps.len();
        let catalog =
            PrepCatalog { preps: self.preps, index, treasure_requirements: self.treasure_requirements };
        // Validate acyclicity eagerly, per spec.md §4.4: "construction fails
        // otherwise."
        if let Err(err) = PrepDependencyGraph::build(&catalog) {
            log::error!("prep catalog construction failed: {err}");
            return Err(err);
        }
        log::debug!("built prep catalog with {count} preps");
        Ok(catalog)
    }
}

/// Directed edges `p -> q` where `q` requires a flag `p` produces (spec.md
/// §3). Constructing this validates acyclicity; a cycle is a `ConfigError`.
pub struct PrepDependencyGraph {
    /// adjacency[p] = the preps that depend on p (p must run before them)
    dependents: HashMap<PrepId, Vec<PrepId>>,
    /// in_degree[p] = number of preps p itself depends on
    in_degree: HashMap<PrepId, usize>,
    order: Vec<PrepId>,
}

impl PrepDependencyGraph {
    pub fn build(catalog: &PrepCatalog) -> Result<Self, PrepError> {
        let order: Vec<PrepId> = catalog.preps.iter().map(|p| p.id.clone()).collect();
        let mut dependents: HashMap<PrepId, Vec<PrepId>> = order.iter().map(|id| (id.clone(), Vec::new())).collect();
        let mut in_degree: HashMap<PrepId, usize> = order.iter().map(|id| (id.clone(), 0)).collect();

        for q in &catalog.preps {
            for req in &q.requires {
                let Requirement::Flag(flag) = req else { continue };
                for p in catalog.preps_producing(*flag) {
                    if p.id == q.id {
                        continue;
                    }
                    dependents.get_mut(&p.id).expect("id from this catalog").push(q.id.clone());
                    *in_degree.get_mut(&q.id).expect("id from this catalog") += 1;
                }
            }
        }

        let graph = PrepDependencyGraph { dependents, in_degree, order };
        graph.topological_sort()?;
        Ok(graph)
    }

    /// Kahn's algorithm, ties broken by catalog insertion order for
    /// stability (spec.md §4.4).
    pub fn topological_sort(&self) -> Result<Vec<PrepId>, PrepError> {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<PrepId> =
            self.order.iter().filter(|id| in_degree[*id] == 0).cloned().collect();
        let mut sorted = Vec::with_capacity(self.order.len());

        while let Some(id) = queue.pop_front() {
            sorted.push(id.clone());
            for dependent in &self.dependents[&id] {
                let deg = in_degree.get_mut(dependent).expect("dependent tracked in in_degree");
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(dependent.clone());
                }
            }
            // Re-sort the ready frontier by original catalog order so ties
            // are broken deterministically rather than by arrival order.
            let mut ready: Vec<PrepId> = queue.into_iter().collect();
            ready.sort_by_key(|id| self.order.iter().position(|o| o == id).unwrap_or(usize::MAX));
            queue = ready.into();
        }

        if sorted.len() != self.order.len() {
            let stuck = self.order.iter().find(|id| in_degree[*id] > 0).expect("some prep must remain stuck in a cycle");
            return Err(PrepError::Cycle(stuck.clone()));
        }
        Ok(sorted)
    }

    /// Topologically sorts only the given subset of prep ids, preserving
    /// the full graph's partial order between them.
    pub fn topological_subset(&self, subset: &[PrepId]) -> Vec<PrepId> {
        let members: HashSet<&PrepId> = subset.iter().collect();
        let full = self.topological_sort().unwrap_or_default();
        full.into_iter().filter(|id| members.contains(id)).collect()
    }

    pub fn levels(&self) -> Vec<Vec<PrepId>> {
        let mut in_degree = self.in_degree.clone();
        let mut remaining: HashSet<PrepId> = self.order.iter().cloned().collect();
        let mut levels = Vec::new();

        while !remaining.is_empty() {
            let mut level: Vec<PrepId> =
                self.order.iter().filter(|id| remaining.contains(*id) && in_degree[*id] == 0).cloned().collect();
            if level.is_empty() {
                break; // cycle; build() already rejects this, so unreachable in practice
            }
            for id in &level {
                remaining.remove(id);
                for dependent in &self.dependents[id] {
                    if let Some(deg) = in_degree.get_mut(dependent) {
                        *deg = deg.saturating_sub(1);
                    }
                }
            }
            level.sort_by_key(|id| self.order.iter().position(|o| o == id).unwrap_or(usize::MAX));
            levels.push(level);
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Effect, PrepAction, PrepKind};
    use engine_contract::testkit::WorldBuilder;
    use engine_contract::RoomId;

    fn prep(id: &str, requires: Vec<Requirement>, produces: &str) -> PrepAction {
        let mut flags = HashSet::new();
        flags.insert(FlagName::new(produces));
        PrepAction {
            id: PrepId::new(id),
            description: id.to_string(),
            locations: vec![RoomId::new("somewhere")],
            requires,
            effect: Effect { immediate_flags: flags, delayed: None },
            kind: PrepKind::Immediate,
            action: Some(engine_contract::Action::Wait),
        }
    }

    #[test]
    fn cyclic_catalog_is_rejected_at_construction() {
        let p = prep("p", vec![Requirement::Flag(FlagName::new("q_flag"))], "p_flag");
        let q = prep("q", vec![Requirement::Flag(FlagName::new("p_flag"))], "q_flag");
        let result = PrepCatalog::builder().prep(p).prep(q).build();
        assert!(matches!(result, Err(PrepError::Cycle(_))));
    }

    #[test]
    fn topological_order_respects_dependencies() {
        let light_candles = prep("light_candles", vec![], "candles_lit");
        let ring_bell = prep("ring_bell", vec![], "bell_rung");
        let read_book = prep(
            "read_book",
            vec![Requirement::Flag(FlagName::new("candles_lit")), Requirement::Flag(FlagName::new("bell_rung"))],
            "exorcism_done",
        );
        let catalog = PrepCatalog::builder().prep(read_book.clone()).prep(light_candles).prep(ring_bell).build().unwrap();
        let graph = PrepDependencyGraph::build(&catalog).unwrap();
        let order = graph.topological_sort().unwrap();
        let pos = |id: &str| order.iter().position(|p| p.0 == id).unwrap();
        assert!(pos("light_candles") < pos("read_book"));
        assert!(pos("ring_bell") < pos("read_book"));
    }

    #[test]
    fn ready_preps_checks_requirements_against_snapshot() {
        let needs_sword = prep("slay", vec![Requirement::Item(ObjectId::new("sword"))], "troll_dead");
        let catalog = PrepCatalog::builder().prep(needs_sword).build().unwrap();

        let (layout, state) = WorldBuilder::new().room(RoomId::new("room"), Default::default()).start_at(RoomId::new("room")).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        assert!(catalog.ready_preps(&snap).is_empty());

        let (layout, state) = WorldBuilder::new()
            .room(RoomId::new("room"), Default::default())
            .start_at(RoomId::new("room"))
            .object_carried(ObjectId::new("sword"))
            .build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        assert_eq!(catalog.ready_preps(&snap), vec![PrepId::new("slay")]);
    }

    #[test]
    fn preps_for_treasure_closes_over_transitive_deps() {
        let base = prep("base", vec![], "base_flag");
        let mid = prep("mid", vec![Requirement::Flag(FlagName::new("base_flag"))], "mid_flag");
        let catalog = PrepCatalog::builder()
            .prep(base)
            .prep(mid)
            .treasure_requires(ObjectId::new("egg"), [FlagName::new("mid_flag")])
            .build()
            .unwrap();
        let mut preps = catalog.preps_for_treasure(ObjectId::new("egg"));
        preps.sort_by_key(|p| p.0.clone());
        assert_eq!(preps, vec![PrepId::new("base"), PrepId::new("mid")]);
    }
}
