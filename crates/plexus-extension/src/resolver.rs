//! Dependency resolution.
//!
//! Produces a load order for discovered candidates via a depth-first
//! topological sort. The contract is deliberately forgiving: the resolver
//! always terminates with a full permutation of its input, no matter what
//! the dependency declarations say.
//!
//! - Tie-break: the outer iteration over candidates and the iteration over
//!   each candidate's dependency list both follow discovery order.
//! - A dependency name absent from the candidate set is warned about and
//!   treated as no edge.
//! - A back-edge into a candidate still being visited is a cycle: it is
//!   warned about once, naming the member, and dropped.
//!
//! Resolution only constrains load *order*; whether dependencies are
//! actually satisfied is enforced separately at load time.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::discovery::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Order candidates so that every resolvable dependency precedes its
/// dependents. Always returns a permutation of the input.
#[must_use]
pub fn resolve(candidates: &[Candidate]) -> Vec<Candidate> {
    // First occurrence wins if a name somehow appears twice.
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, candidate) in candidates.iter().enumerate() {
        index.entry(candidate.name()).or_insert(i);
    }

    let mut marks = vec![Mark::Unvisited; candidates.len()];
    let mut order = Vec::with_capacity(candidates.len());

    for i in 0..candidates.len() {
        if marks[i] == Mark::Unvisited {
            visit(i, candidates, &index, &mut marks, &mut order);
        }
    }

    debug!(
        "Resolved load order: {:?}",
        order
            .iter()
            .map(|&i| candidates[i].name())
            .collect::<Vec<_>>()
    );

    order.into_iter().map(|i| candidates[i].clone()).collect()
}

fn visit(
    i: usize,
    candidates: &[Candidate],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) {
    marks[i] = Mark::InProgress;

    for dep in &candidates[i].manifest.dependencies {
        match index.get(dep.as_str()) {
            None => {
                warn!(
                    "Extension '{}' depends on '{dep}', which is not among the \
                     discovered candidates; ignoring the edge for ordering",
                    candidates[i].name()
                );
            },
            Some(&j) => match marks[j] {
                Mark::Done => {},
                Mark::InProgress => {
                    warn!(
                        "Dependency cycle detected at extension '{dep}'; \
                         dropping the edge from '{}'",
                        candidates[i].name()
                    );
                },
                Mark::Unvisited => visit(j, candidates, index, marks, order),
            },
        }
    }

    marks[i] = Mark::Done;
    order.push(i);
}
