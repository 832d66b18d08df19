//! Binary space partition rectangle packer for a single atlas page.
//!
//! Nodes live in a flat arena and refer to their children by index. When both
//! children of a split node are filled, the node collapses to `Filled` and the
//! two child slots are recycled for later splits.

/// State of a packer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// The whole region is allocated.
    Filled,
    /// The whole region is free.
    Empty,
    /// The region is divided between two children.
    Split,
    /// Free arena slot, not reachable from the root.
    Unused,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    state: NodeState,
    children: [usize; 2],
}

impl Node {
    fn empty(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            state: NodeState::Empty,
            children: [0; 2],
        }
    }

    fn can_hold(&self, width: u32, height: u32) -> bool {
        self.width >= width && self.height >= height
    }
}

const ROOT: usize = 0;

/// Allocator for axis-aligned rectangles on a square page.
#[derive(Debug, Clone)]
pub struct Packer {
    nodes: Vec<Node>,
    free_slots: Vec<usize>,
}

impl Packer {
    /// Create a packer whose root spans `width` x `width` pixels.
    pub fn new(width: u32) -> Self {
        Self {
            nodes: vec![Node::empty(0, 0, width, width)],
            free_slots: Vec::new(),
        }
    }

    /// Find and reserve space for a `width` x `height` rectangle.
    ///
    /// Returns the top-left corner of the reserved region, or `None` when the
    /// page has no free region large enough.
    pub fn find_space(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.find_in(ROOT, width, height)
    }

    /// Number of arena slots, including recycled ones.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the page has no free space left at all.
    pub fn is_full(&self) -> bool {
        self.nodes[ROOT].state == NodeState::Filled
    }

    fn find_in(&mut self, index: usize, width: u32, height: u32) -> Option<(u32, u32)> {
        let node = self.nodes[index];
        if !node.can_hold(width, height) || node.state == NodeState::Filled {
            return None;
        }

        match node.state {
            NodeState::Split => {
                let [first, second] = node.children;

                let mut found = None;
                if self.nodes[first].can_hold(width, height) {
                    found = self.find_in(first, width, height);
                }
                if found.is_none() && self.nodes[second].can_hold(width, height) {
                    found = self.find_in(second, width, height);
                }

                if self.nodes[first].state == NodeState::Filled
                    && self.nodes[second].state == NodeState::Filled
                {
                    self.nodes[index].state = NodeState::Filled;
                    self.release(first);
                    self.release(second);
                }

                found
            }
            NodeState::Empty => {
                if node.width == width && node.height == height {
                    self.nodes[index].state = NodeState::Filled;
                    return Some((node.x, node.y));
                }

                if node.height == height {
                    // Height already fits: cut off the requested width and fill it.
                    let left = self.allocate(Node::empty(node.x, node.y, width, node.height));
                    let right = self.allocate(Node::empty(
                        node.x + width,
                        node.y,
                        node.width - width,
                        node.height,
                    ));
                    self.nodes[left].state = NodeState::Filled;
                    self.split(index, left, right);
                    return Some((node.x, node.y));
                }

                let top = self.allocate(Node::empty(node.x, node.y, node.width, height));
                let bottom = self.allocate(Node::empty(
                    node.x,
                    node.y + height,
                    node.width,
                    node.height - height,
                ));
                self.split(index, top, bottom);
                self.find_in(top, width, height)
            }
            NodeState::Filled | NodeState::Unused => {
                debug_assert!(
                    node.state != NodeState::Unused,
                    "unused packer node {} reachable from root",
                    index
                );
                None
            }
        }
    }

    fn split(&mut self, index: usize, first: usize, second: usize) {
        let node = &mut self.nodes[index];
        node.state = NodeState::Split;
        node.children = [first, second];
    }

    fn allocate(&mut self, node: Node) -> usize {
        match self.free_slots.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, index: usize) {
        self.nodes[index].state = NodeState::Unused;
        self.free_slots.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the tree from the root and return every reachable node.
    fn reachable(packer: &Packer) -> Vec<Node> {
        let mut out = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            let node = packer.nodes[index];
            out.push(node);
            if node.state == NodeState::Split {
                stack.extend(node.children);
            }
        }
        out
    }

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    #[test]
    fn test_exact_fit_fills_root() {
        let mut packer = Packer::new(64);
        assert_eq!(packer.find_space(64, 64), Some((0, 0)));
        assert!(packer.is_full());
        assert_eq!(packer.find_space(1, 1), None);
    }

    #[test]
    fn test_too_large_fails() {
        let mut packer = Packer::new(64);
        assert_eq!(packer.find_space(65, 1), None);
        assert_eq!(packer.find_space(1, 65), None);
        assert!(!packer.is_full());
    }

    #[test]
    fn test_horizontal_split_when_height_matches() {
        let mut packer = Packer::new(64);
        assert_eq!(packer.find_space(16, 64), Some((0, 0)));
        assert_eq!(packer.find_space(16, 64), Some((16, 0)));
        assert_eq!(packer.find_space(32, 64), Some((32, 0)));
        assert!(packer.is_full());
    }

    #[test]
    fn test_vertical_split_then_horizontal() {
        let mut packer = Packer::new(64);
        // Neither dimension matches: top strip 64x16, then a 16x16 cell inside it.
        assert_eq!(packer.find_space(16, 16), Some((0, 0)));
        assert_eq!(packer.find_space(16, 16), Some((16, 0)));
        // Taller than the remaining top strip, goes below it.
        assert_eq!(packer.find_space(16, 32), Some((0, 16)));
    }

    #[test]
    fn test_perfect_fit_tiling() {
        let mut packer = Packer::new(64);
        let requests = [(64, 32), (32, 32), (32, 16), (16, 16), (16, 16)];
        let mut placed = Vec::new();
        for (w, h) in requests {
            let (x, y) = packer.find_space(w, h).expect("tiling must fit");
            placed.push((x, y, w, h));
        }

        let area: u32 = placed.iter().map(|r| r.2 * r.3).sum();
        assert_eq!(area, 64 * 64);
        assert!(packer.is_full());
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!overlaps(*a, *b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_uniform_cells_tile_page() {
        let mut packer = Packer::new(64);
        for _ in 0..16 {
            assert!(packer.find_space(16, 16).is_some());
        }
        assert!(packer.is_full());
        assert_eq!(packer.find_space(1, 1), None);
    }

    #[test]
    fn test_collapse_recycles_slots() {
        let mut packer = Packer::new(64);
        packer.find_space(64, 16).unwrap();
        for _ in 0..4 {
            packer.find_space(16, 16).unwrap();
        }
        let len_after_row = packer.arena_len();

        // The completed row collapsed, so the next split reuses its slots.
        assert_eq!(packer.find_space(16, 16), Some((0, 32)));
        assert_eq!(packer.arena_len(), len_after_row);
        assert!(reachable(&packer)
            .iter()
            .all(|node| node.state != NodeState::Unused));
    }

    #[test]
    fn test_full_page_collapses_to_root() {
        let mut packer = Packer::new(64);
        for _ in 0..4 {
            packer.find_space(16, 64).unwrap();
        }
        assert!(packer.is_full());
        assert_eq!(reachable(&packer).len(), 1);
    }

    #[test]
    fn test_children_tile_parent() {
        let mut packer = Packer::new(128);
        for (w, h) in [(40, 20), (10, 30), (70, 20), (128, 8), (5, 5)] {
            packer.find_space(w, h);
        }

        for node in reachable(&packer) {
            assert_ne!(node.state, NodeState::Unused);
            if node.state == NodeState::Split {
                let a = packer.nodes[node.children[0]];
                let b = packer.nodes[node.children[1]];
                assert_eq!(
                    a.width as u64 * a.height as u64 + b.width as u64 * b.height as u64,
                    node.width as u64 * node.height as u64
                );
                assert!(!overlaps(
                    (a.x, a.y, a.width, a.height),
                    (b.x, b.y, b.width, b.height)
                ));
            }
        }
    }
}
