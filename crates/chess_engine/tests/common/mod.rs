//! Scripted game trees for exercising the search without chess rules.
#![allow(dead_code)]

use std::collections::HashSet;

use chess_engine::{BoardEngine, Perspective};
use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    First,
    Second,
}

impl Player {
    fn opposite(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl Perspective for Player {
    fn sign(self) -> i32 {
        match self {
            Player::First => 1,
            Player::Second => -1,
        }
    }
}

/// Shape of a game tree. Leaf values are scored for `Player::First`.
#[derive(Debug, Clone)]
pub enum Spec {
    Leaf(i32),
    /// The side to move here is checkmated.
    Mate,
    Draw,
    Node(Vec<Spec>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Leaf(i32),
    Mate,
    Draw,
    Inner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    kind: Kind,
    children: Vec<usize>,
}

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("move {index} is not playable at node {node}")]
    Rejected { node: usize, index: usize },
}

/// A game tree walked one ply at a time. Moves are child indices and the
/// identity of a position is its node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBoard {
    nodes: Vec<TreeNode>,
    path: Vec<usize>,
    root_side: Player,
    rejected: HashSet<(usize, usize)>,
}

impl TreeBoard {
    pub fn new(spec: &Spec) -> Self {
        Self::with_root_side(spec, Player::First)
    }

    pub fn with_root_side(spec: &Spec, root_side: Player) -> Self {
        let mut nodes = Vec::new();
        build(&mut nodes, spec);
        TreeBoard {
            nodes,
            path: vec![0],
            root_side,
            rejected: HashSet::new(),
        }
    }

    /// Makes `apply_move` fail for child `index` of the node reached by `path`.
    pub fn reject(&mut self, path: &[usize], index: usize) {
        let node = path.iter().fold(0, |node, &i| self.nodes[node].children[i]);
        self.rejected.insert((node, index));
    }

    pub fn ply(&self) -> usize {
        self.path.len() - 1
    }

    fn current(&self) -> &TreeNode {
        &self.nodes[self.path[self.path.len() - 1]]
    }
}

fn build(nodes: &mut Vec<TreeNode>, spec: &Spec) -> usize {
    let id = nodes.len();
    let kind = match spec {
        Spec::Leaf(value) => Kind::Leaf(*value),
        Spec::Mate => Kind::Mate,
        Spec::Draw => Kind::Draw,
        Spec::Node(_) => Kind::Inner,
    };
    nodes.push(TreeNode { kind, children: Vec::new() });
    if let Spec::Node(children) = spec {
        let ids: Vec<usize> = children.iter().map(|child| build(nodes, child)).collect();
        nodes[id].children = ids;
    }
    id
}

impl BoardEngine for TreeBoard {
    type Move = usize;
    type Side = Player;
    type Identity = usize;
    type Error = TreeError;

    fn side_to_move(&self) -> Player {
        if self.ply() % 2 == 0 {
            self.root_side
        } else {
            self.root_side.opposite()
        }
    }

    fn legal_moves(&self) -> Vec<usize> {
        (0..self.current().children.len()).collect()
    }

    fn apply_move(&mut self, index: usize) -> Result<(), TreeError> {
        let node = self.path[self.path.len() - 1];
        match self.nodes[node].children.get(index) {
            Some(&child) if !self.rejected.contains(&(node, index)) => {
                self.path.push(child);
                Ok(())
            }
            _ => Err(TreeError::Rejected { node, index }),
        }
    }

    fn undo_move(&mut self) {
        if self.path.len() > 1 {
            self.path.pop();
        }
    }

    fn is_stalemate(&self) -> bool {
        self.current().kind == Kind::Draw
    }

    fn is_terminal_by_mate(&self) -> bool {
        self.current().kind == Kind::Mate
    }

    fn material_balance(&self) -> i32 {
        match self.current().kind {
            Kind::Leaf(value) => value,
            _ => 0,
        }
    }

    fn domination_score(&self) -> i32 {
        0
    }

    fn stable_identity(&self) -> usize {
        self.path[self.path.len() - 1]
    }
}

/// Tree of uniform `height`, with the odd mate or draw cutting a branch short.
/// Leaf values are drawn from a narrow range so equal scores are common.
pub fn random_tree(rng: &mut StdRng, height: u8) -> Spec {
    if height == 0 {
        return Spec::Leaf(rng.gen_range(-5..=5));
    }
    if rng.gen_ratio(1, 12) {
        return if rng.gen_bool(0.5) { Spec::Mate } else { Spec::Draw };
    }
    let width = rng.gen_range(1..=4);
    Spec::Node((0..width).map(|_| random_tree(rng, height - 1)).collect())
}

/// Like `random_tree`, but the root always has moves.
pub fn random_game(rng: &mut StdRng, height: u8) -> Spec {
    let width = rng.gen_range(2..=4);
    Spec::Node((0..width).map(|_| random_tree(rng, height - 1)).collect())
}
