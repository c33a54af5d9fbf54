//! Edmonds' blossom algorithm for maximum-weight matching.
//!
//! A primal-dual solver in `O(n^3)` over an explicit edge list. Odd cycles of
//! tight edges are shrunk into blossoms, dual variables are adjusted until an
//! augmenting path appears, and blossoms are expanded again once their dual
//! reaches zero. Cardinality always takes priority: the result is a
//! maximum-weight matching among the matchings of largest size, which on a
//! complete graph with an even vertex count is a perfect matching.
//!
//! Endpoints are addressed as `2 * k` (first endpoint of edge `k`) and
//! `2 * k + 1` (second endpoint), so `p ^ 1` names the opposite end of the
//! same edge. Indices below `vertex_count` are vertices; the remainder are
//! blossom slots.
//!
//! All weights must be even integers; slacks of edges between two outer
//! blossoms then stay even and every dual update is exact.

use std::mem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Label {
    Free,
    Outer,
    Inner,
    /// Outer, and already visited by the current blossom scan.
    Visited,
}

#[derive(Clone, Copy, Debug)]
enum DualStep {
    /// A free vertex gains a tight edge to an outer blossom.
    Grow(usize),
    /// Two outer blossoms gain a tight edge between them.
    Merge(usize),
    /// An inner blossom's dual reaches zero.
    Expand(usize),
    /// No further improvement is possible.
    Stop,
}

/// One weighted undirected edge `(left, right, weight)`.
pub(super) type WeightedEdge = (usize, usize, i64);

/// Returns the mate of every vertex in a maximum-weight maximum-cardinality
/// matching of `edges` over `vertex_count` vertices.
pub(super) fn max_weight_matching(
    vertex_count: usize,
    edges: &[WeightedEdge],
) -> Vec<Option<usize>> {
    if vertex_count == 0 || edges.is_empty() {
        return vec![None; vertex_count];
    }
    let mut solver = BlossomSolver::new(vertex_count, edges);
    solver.solve();
    solver
        .mate
        .iter()
        .map(|end| end.map(|p| solver.endpoint[p]))
        .collect()
}

struct BlossomSolver<'a> {
    vertex_count: usize,
    edges: &'a [WeightedEdge],
    endpoint: Vec<usize>,
    neighbour_ends: Vec<Vec<usize>>,
    mate: Vec<Option<usize>>,
    label: Vec<Label>,
    label_end: Vec<Option<usize>>,
    in_blossom: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    base: Vec<Option<usize>>,
    child_ends: Vec<Vec<usize>>,
    best_edge: Vec<Option<usize>>,
    best_edges: Vec<Option<Vec<usize>>>,
    unused: Vec<usize>,
    dual: Vec<i64>,
    allowed: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> BlossomSolver<'a> {
    fn new(vertex_count: usize, edges: &'a [WeightedEdge]) -> Self {
        let slots = 2 * vertex_count;
        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbour_ends = vec![Vec::new(); vertex_count];
        for (k, &(left, right, _)) in edges.iter().enumerate() {
            endpoint.push(left);
            endpoint.push(right);
            neighbour_ends[left].push(2 * k + 1);
            neighbour_ends[right].push(2 * k);
        }
        let heaviest = edges
            .iter()
            .map(|&(_, _, weight)| weight)
            .max()
            .unwrap_or(0)
            .max(0);

        let mut dual = vec![0; slots];
        dual[..vertex_count].fill(heaviest);
        let mut base = vec![None; slots];
        for (vertex, slot) in base.iter_mut().enumerate().take(vertex_count) {
            *slot = Some(vertex);
        }

        Self {
            vertex_count,
            edges,
            endpoint,
            neighbour_ends,
            mate: vec![None; vertex_count],
            label: vec![Label::Free; slots],
            label_end: vec![None; slots],
            in_blossom: (0..vertex_count).collect(),
            parent: vec![None; slots],
            children: vec![Vec::new(); slots],
            base,
            child_ends: vec![Vec::new(); slots],
            best_edge: vec![None; slots],
            best_edges: vec![None; slots],
            unused: (vertex_count..slots).collect(),
            dual,
            allowed: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let (left, right, weight) = self.edges[k];
        self.dual[left] + self.dual[right] - 2 * weight
    }

    fn leaves(&self, blossom: usize) -> Vec<usize> {
        let mut found = Vec::new();
        let mut stack = vec![blossom];
        while let Some(top) = stack.pop() {
            if top < self.vertex_count {
                found.push(top);
            } else {
                stack.extend(self.children[top].iter().rev().copied());
            }
        }
        found
    }

    fn solve(&mut self) {
        let n = self.vertex_count;
        for _ in 0..n {
            self.label.fill(Label::Free);
            self.best_edge.fill(None);
            for slot in &mut self.best_edges[n..] {
                *slot = None;
            }
            self.allowed.fill(false);
            self.queue.clear();

            for vertex in 0..n {
                if self.mate[vertex].is_none() && self.label[self.in_blossom[vertex]] == Label::Free
                {
                    self.assign_label(vertex, Label::Outer, None);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(vertex) = self.queue.pop() else {
                        break;
                    };
                    augmented = self.scan_vertex(vertex);
                }
                if augmented {
                    break;
                }
                match self.adjust_duals() {
                    DualStep::Stop => break,
                    DualStep::Grow(k) => {
                        self.allowed[k] = true;
                        let (left, right, _) = self.edges[k];
                        let outer = if self.label[self.in_blossom[left]] == Label::Free {
                            right
                        } else {
                            left
                        };
                        self.queue.push(outer);
                    }
                    DualStep::Merge(k) => {
                        self.allowed[k] = true;
                        self.queue.push(self.edges[k].0);
                    }
                    DualStep::Expand(blossom) => self.expand_blossom(blossom, false),
                }
            }

            if !augmented {
                break;
            }

            for blossom in n..2 * n {
                if self.parent[blossom].is_none()
                    && self.base[blossom].is_some()
                    && self.label[blossom] == Label::Outer
                    && self.dual[blossom] == 0
                {
                    self.expand_blossom(blossom, true);
                }
            }
        }
    }

    /// Explores the edges of outer vertex `vertex`; returns `true` once the
    /// matching has been augmented.
    fn scan_vertex(&mut self, vertex: usize) -> bool {
        for index in 0..self.neighbour_ends[vertex].len() {
            let p = self.neighbour_ends[vertex][index];
            let k = p / 2;
            let other = self.endpoint[p];
            if self.in_blossom[vertex] == self.in_blossom[other] {
                continue;
            }
            let mut edge_slack = 0;
            if !self.allowed[k] {
                edge_slack = self.slack(k);
                if edge_slack <= 0 {
                    self.allowed[k] = true;
                }
            }
            let other_blossom = self.in_blossom[other];
            if self.allowed[k] {
                match self.label[other_blossom] {
                    Label::Free => self.assign_label(other, Label::Inner, Some(p ^ 1)),
                    Label::Outer => match self.scan_blossom(vertex, other) {
                        Some(base) => self.add_blossom(base, k),
                        None => {
                            self.augment_matching(k);
                            return true;
                        }
                    },
                    Label::Inner | Label::Visited => {
                        if self.label[other] == Label::Free {
                            self.label[other] = Label::Inner;
                            self.label_end[other] = Some(p ^ 1);
                        }
                    }
                }
            } else if self.label[other_blossom] == Label::Outer {
                let own = self.in_blossom[vertex];
                if self.best_edge[own].is_none_or(|best| edge_slack < self.slack(best)) {
                    self.best_edge[own] = Some(k);
                }
            } else if self.label[other] == Label::Free
                && self.best_edge[other].is_none_or(|best| edge_slack < self.slack(best))
            {
                self.best_edge[other] = Some(k);
            }
        }
        false
    }

    fn adjust_duals(&mut self) -> DualStep {
        let n = self.vertex_count;
        let mut chosen: Option<(i64, DualStep)> = None;

        for vertex in 0..n {
            if self.label[self.in_blossom[vertex]] == Label::Free
                && let Some(k) = self.best_edge[vertex]
            {
                let delta = self.slack(k);
                if chosen.is_none_or(|(best, _)| delta < best) {
                    chosen = Some((delta, DualStep::Grow(k)));
                }
            }
        }
        for blossom in 0..2 * n {
            if self.parent[blossom].is_none()
                && self.label[blossom] == Label::Outer
                && let Some(k) = self.best_edge[blossom]
            {
                let delta = self.slack(k) / 2;
                if chosen.is_none_or(|(best, _)| delta < best) {
                    chosen = Some((delta, DualStep::Merge(k)));
                }
            }
        }
        for blossom in n..2 * n {
            if self.base[blossom].is_some()
                && self.parent[blossom].is_none()
                && self.label[blossom] == Label::Inner
                && chosen.is_none_or(|(best, _)| self.dual[blossom] < best)
            {
                chosen = Some((self.dual[blossom], DualStep::Expand(blossom)));
            }
        }
        let (delta, step) = chosen.unwrap_or_else(|| {
            let smallest = self.dual[..n].iter().copied().min().unwrap_or(0);
            (smallest.max(0), DualStep::Stop)
        });

        for vertex in 0..n {
            match self.label[self.in_blossom[vertex]] {
                Label::Outer => self.dual[vertex] -= delta,
                Label::Inner => self.dual[vertex] += delta,
                Label::Free | Label::Visited => {}
            }
        }
        for blossom in n..2 * n {
            if self.base[blossom].is_some() && self.parent[blossom].is_none() {
                match self.label[blossom] {
                    Label::Outer => self.dual[blossom] += delta,
                    Label::Inner => self.dual[blossom] -= delta,
                    Label::Free | Label::Visited => {}
                }
            }
        }
        step
    }

    fn assign_label(&mut self, vertex: usize, label: Label, end: Option<usize>) {
        let blossom = self.in_blossom[vertex];
        self.label[vertex] = label;
        self.label[blossom] = label;
        self.label_end[vertex] = end;
        self.label_end[blossom] = end;
        self.best_edge[vertex] = None;
        self.best_edge[blossom] = None;
        match label {
            Label::Outer => {
                let leaves = self.leaves(blossom);
                self.queue.extend(leaves);
            }
            Label::Inner => {
                if let Some(base) = self.base[blossom]
                    && let Some(mate) = self.mate[base]
                {
                    let next = self.endpoint[mate];
                    self.assign_label(next, Label::Outer, Some(mate ^ 1));
                }
            }
            Label::Free | Label::Visited => {}
        }
    }

    /// Walks back from `left` and `right` towards their tree roots. Returns the
    /// base of the new blossom, or `None` when the roots differ and an
    /// augmenting path exists.
    fn scan_blossom(&mut self, left: usize, right: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut found = None;
        let mut current = Some(left);
        let mut other = Some(right);
        while let Some(vertex) = current {
            let blossom = self.in_blossom[vertex];
            if self.label[blossom] == Label::Visited {
                found = self.base[blossom];
                break;
            }
            path.push(blossom);
            self.label[blossom] = Label::Visited;
            current = self.label_end[blossom].and_then(|p| {
                let inner = self.in_blossom[self.endpoint[p]];
                self.label_end[inner].map(|q| self.endpoint[q])
            });
            if other.is_some() {
                mem::swap(&mut current, &mut other);
            }
        }
        for blossom in path {
            self.label[blossom] = Label::Outer;
        }
        found
    }

    fn add_blossom(&mut self, base: usize, k: usize) {
        let Some(blossom) = self.unused.pop() else {
            return;
        };
        let (left, right, _) = self.edges[k];
        let base_blossom = self.in_blossom[base];
        let mut left_blossom = self.in_blossom[left];
        let mut right_blossom = self.in_blossom[right];

        self.base[blossom] = Some(base);
        self.parent[blossom] = None;
        self.parent[base_blossom] = Some(blossom);

        let mut path = Vec::new();
        let mut ends = Vec::new();
        while left_blossom != base_blossom {
            self.parent[left_blossom] = Some(blossom);
            path.push(left_blossom);
            let Some(p) = self.label_end[left_blossom] else {
                break;
            };
            ends.push(p);
            left_blossom = self.in_blossom[self.endpoint[p]];
        }
        path.push(base_blossom);
        path.reverse();
        ends.reverse();
        ends.push(2 * k);
        while right_blossom != base_blossom {
            self.parent[right_blossom] = Some(blossom);
            path.push(right_blossom);
            let Some(p) = self.label_end[right_blossom] else {
                break;
            };
            ends.push(p ^ 1);
            right_blossom = self.in_blossom[self.endpoint[p]];
        }

        self.children[blossom] = path.clone();
        self.child_ends[blossom] = ends;
        self.label[blossom] = Label::Outer;
        self.label_end[blossom] = self.label_end[base_blossom];
        self.dual[blossom] = 0;

        for leaf in self.leaves(blossom) {
            if self.label[self.in_blossom[leaf]] == Label::Inner {
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = blossom;
        }

        let mut best_to: Vec<Option<usize>> = vec![None; 2 * self.vertex_count];
        for &child in &path {
            let stored = self.best_edges[child].take();
            let candidates: Vec<usize> = match stored {
                Some(list) => list,
                None => self
                    .leaves(child)
                    .into_iter()
                    .flat_map(|leaf| self.neighbour_ends[leaf].iter().map(|p| p / 2))
                    .collect(),
            };
            for edge in candidates {
                let (from, to, _) = self.edges[edge];
                let far = if self.in_blossom[to] == blossom { from } else { to };
                let far_blossom = self.in_blossom[far];
                if far_blossom != blossom
                    && self.label[far_blossom] == Label::Outer
                    && best_to[far_blossom].is_none_or(|best| self.slack(edge) < self.slack(best))
                {
                    best_to[far_blossom] = Some(edge);
                }
            }
            self.best_edge[child] = None;
        }

        let list: Vec<usize> = best_to.into_iter().flatten().collect();
        self.best_edge[blossom] = None;
        for &edge in &list {
            if self.best_edge[blossom].is_none_or(|best| self.slack(edge) < self.slack(best)) {
                self.best_edge[blossom] = Some(edge);
            }
        }
        self.best_edges[blossom] = Some(list);
    }

    fn expand_blossom(&mut self, blossom: usize, end_stage: bool) {
        let children = self.children[blossom].clone();
        for &child in &children {
            self.parent[child] = None;
            if child < self.vertex_count {
                self.in_blossom[child] = child;
            } else if end_stage && self.dual[child] == 0 {
                self.expand_blossom(child, end_stage);
            } else {
                for leaf in self.leaves(child) {
                    self.in_blossom[leaf] = child;
                }
            }
        }

        if !end_stage && self.label[blossom] == Label::Inner {
            self.relabel_expanded(blossom, &children);
        }

        self.label[blossom] = Label::Free;
        self.label_end[blossom] = None;
        self.children[blossom].clear();
        self.child_ends[blossom].clear();
        self.base[blossom] = None;
        self.best_edges[blossom] = None;
        self.best_edge[blossom] = None;
        self.unused.push(blossom);
    }

    /// Relabels the children of an expanded inner blossom so the alternating
    /// tree stays valid through the even-length side of the cycle.
    fn relabel_expanded(&mut self, blossom: usize, children: &[usize]) {
        let Some(label_end) = self.label_end[blossom] else {
            return;
        };
        let entry = self.in_blossom[self.endpoint[label_end ^ 1]];
        let Some(position) = children.iter().position(|&child| child == entry) else {
            return;
        };
        let ends = self.child_ends[blossom].clone();
        let (mut j, step, trick) = walk_direction(position, children.len());
        let mut p = label_end;

        while j != 0 {
            let near = self.endpoint[p ^ 1];
            self.label[near] = Label::Free;
            let q = ends[wrap(j - trick_offset(trick), ends.len())];
            self.label[self.endpoint[q ^ trick ^ 1]] = Label::Free;
            self.assign_label(near, Label::Inner, Some(p));
            self.allowed[q / 2] = true;
            j += step;
            p = ends[wrap(j - trick_offset(trick), ends.len())] ^ trick;
            self.allowed[p / 2] = true;
            j += step;
        }

        let child = children[wrap(j, children.len())];
        let near = self.endpoint[p ^ 1];
        self.label[near] = Label::Inner;
        self.label[child] = Label::Inner;
        self.label_end[near] = Some(p);
        self.label_end[child] = Some(p);
        self.best_edge[child] = None;
        j += step;

        while children[wrap(j, children.len())] != entry {
            let child = children[wrap(j, children.len())];
            if self.label[child] != Label::Outer
                && let Some(leaf) = self
                    .leaves(child)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != Label::Free)
            {
                self.label[leaf] = Label::Free;
                if let Some(base) = self.base[child]
                    && let Some(mate) = self.mate[base]
                {
                    self.label[self.endpoint[mate]] = Label::Free;
                }
                let end = self.label_end[leaf];
                self.assign_label(leaf, Label::Inner, end);
            }
            j += step;
        }
    }

    /// Swaps matched and unmatched edges along the even side of `blossom` so
    /// that `vertex` becomes its base.
    fn augment_blossom(&mut self, blossom: usize, vertex: usize) {
        let mut top = vertex;
        while let Some(parent) = self.parent[top]
            && parent != blossom
        {
            top = parent;
        }
        if top >= self.vertex_count {
            self.augment_blossom(top, vertex);
        }

        let children = self.children[blossom].clone();
        let ends = self.child_ends[blossom].clone();
        let Some(position) = children.iter().position(|&child| child == top) else {
            return;
        };
        let (mut j, step, trick) = walk_direction(position, children.len());
        while j != 0 {
            j += step;
            let child = children[wrap(j, children.len())];
            let p = ends[wrap(j - trick_offset(trick), ends.len())] ^ trick;
            if child >= self.vertex_count {
                let inner = self.endpoint[p];
                self.augment_blossom(child, inner);
            }
            j += step;
            let child = children[wrap(j, children.len())];
            if child >= self.vertex_count {
                let outer = self.endpoint[p ^ 1];
                self.augment_blossom(child, outer);
            }
            let (near, far) = (self.endpoint[p], self.endpoint[p ^ 1]);
            self.mate[near] = Some(p ^ 1);
            self.mate[far] = Some(p);
        }

        self.children[blossom].rotate_left(position);
        self.child_ends[blossom].rotate_left(position);
        if let Some(&first) = self.children[blossom].first() {
            self.base[blossom] = self.base[first];
        }
    }

    fn augment_matching(&mut self, k: usize) {
        let (left, right, _) = self.edges[k];
        for (start, first_end) in [(left, 2 * k + 1), (right, 2 * k)] {
            let mut outer = start;
            let mut end = first_end;
            loop {
                let outer_blossom = self.in_blossom[outer];
                if outer_blossom >= self.vertex_count {
                    self.augment_blossom(outer_blossom, outer);
                }
                self.mate[outer] = Some(end);
                let Some(label_end) = self.label_end[outer_blossom] else {
                    break;
                };
                let inner_blossom = self.in_blossom[self.endpoint[label_end]];
                let Some(inner_end) = self.label_end[inner_blossom] else {
                    break;
                };
                outer = self.endpoint[inner_end];
                let inner = self.endpoint[inner_end ^ 1];
                if inner_blossom >= self.vertex_count {
                    self.augment_blossom(inner_blossom, inner);
                }
                self.mate[inner] = Some(inner_end);
                end = inner_end ^ 1;
            }
        }
    }
}

/// Starting index, step and endpoint trick for walking a blossom cycle from
/// `position` back to its base along the even-length side.
fn walk_direction(position: usize, len: usize) -> (isize, isize, usize) {
    let position = to_signed(position);
    if position % 2 == 1 {
        (position - to_signed(len), 1, 0)
    } else {
        (position, -1, 1)
    }
}

fn trick_offset(trick: usize) -> isize {
    to_signed(trick)
}

fn to_signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// Maps a possibly negative cycle index onto `0..len`.
fn wrap(index: isize, len: usize) -> usize {
    let wrapped = index.rem_euclid(to_signed(len));
    usize::try_from(wrapped).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_of(edges: &[WeightedEdge], mates: &[Option<usize>]) -> i64 {
        edges
            .iter()
            .filter(|&&(left, right, _)| mates[left] == Some(right))
            .map(|&(_, _, weight)| weight)
            .sum()
    }

    #[test]
    fn empty_inputs_leave_everything_unmatched() {
        assert_eq!(max_weight_matching(3, &[]), vec![None; 3]);
        assert!(max_weight_matching(0, &[]).is_empty());
    }

    #[test]
    fn single_edge_is_matched() {
        assert_eq!(max_weight_matching(2, &[(0, 1, 2)]), vec![Some(1), Some(0)]);
    }

    #[test]
    fn prefers_heavier_pair_of_edges_over_heavy_middle() {
        // Path 0-1-2-3: the middle edge alone is lighter than both ends.
        let edges = [(0, 1, 6), (1, 2, 10), (2, 3, 6)];
        let mates = max_weight_matching(4, &edges);
        assert_eq!(mates, vec![Some(1), Some(0), Some(3), Some(2)]);
    }

    #[test]
    fn maximum_cardinality_beats_single_heavy_edge() {
        let edges = [(0, 1, 2), (1, 2, 20), (2, 3, 2)];
        let mates = max_weight_matching(4, &edges);
        assert!(mates.iter().all(Option::is_some));
        assert_eq!(weight_of(&edges, &mates), 4);
    }

    #[test]
    fn resolves_odd_cycles_through_blossoms() {
        // A triangle 0-1-2 with pendant edges; the optimum pairs each
        // triangle vertex except one with its pendant.
        let edges = [
            (0, 1, 16),
            (1, 2, 16),
            (0, 2, 16),
            (0, 3, 10),
            (1, 4, 10),
            (2, 5, 10),
        ];
        let mates = max_weight_matching(6, &edges);
        assert!(mates.iter().all(Option::is_some));
        assert_eq!(weight_of(&edges, &mates), 30);
    }

    #[test]
    fn pendant_edges_force_the_perfect_matching() {
        // 7 only touches 6 and 5 only touches 4, which leaves 3 to 1 and
        // 0 to 2 despite the heavier edges around the 0-1-2 triangle.
        let edges = [
            (0, 1, 18),
            (0, 2, 20),
            (1, 2, 20),
            (1, 3, 16),
            (2, 4, 16),
            (3, 4, 20),
            (4, 5, 12),
            (3, 6, 12),
            (6, 7, 2),
        ];
        let mates = max_weight_matching(8, &edges);
        assert!(mates.iter().all(Option::is_some));
        assert_eq!(
            mates,
            vec![Some(2), Some(3), Some(0), Some(1), Some(5), Some(4), Some(7), Some(6)]
        );
        assert_eq!(weight_of(&edges, &mates), 20 + 16 + 12 + 2);
    }
}
