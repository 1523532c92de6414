use std::rc::Rc;

/// A position in the search tree. Children hold their parent through an `Rc`, parents
/// never hold children, so a subtree is freed as soon as nothing refers to its leaves.
#[derive(Debug)]
pub struct SearchNode<TAction, TGameState> {
    pub state: TGameState,
    pub parent: Option<Rc<SearchNode<TAction, TGameState>>>,
    pub action: Option<TAction>,
    pub depth: usize,
}

impl<TAction, TGameState> SearchNode<TAction, TGameState> {
    pub fn root(state: TGameState) -> Rc<Self> {
        Rc::new(Self {
            state,
            parent: None,
            action: None,
            depth: 0,
        })
    }

    pub fn child(parent: &Rc<Self>, action: TAction, state: TGameState) -> Rc<Self> {
        Rc::new(Self {
            state,
            parent: Some(Rc::clone(parent)),
            action: Some(action),
            depth: parent.depth + 1,
        })
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Nodes from the root down to this one.
    pub fn lineage(&self) -> Vec<&Self> {
        let mut nodes = Vec::with_capacity(self.depth + 1);
        let mut cursor = Some(self);

        while let Some(current) = cursor {
            nodes.push(current);
            cursor = current.parent.as_deref();
        }

        nodes.reverse();
        nodes
    }
}

impl<TAction: Clone, TGameState> SearchNode<TAction, TGameState> {
    /// Actions along the edges from the root to this node, in play order.
    pub fn plan(&self) -> Vec<TAction> {
        self.actions_since(0)
    }

    /// Actions along the edges below the ancestor at `ancestor_depth`.
    pub fn actions_since(&self, ancestor_depth: usize) -> Vec<TAction> {
        let mut actions = Vec::with_capacity(self.depth.saturating_sub(ancestor_depth));
        let mut cursor = Some(self);

        while let Some(current) = cursor {
            if current.depth <= ancestor_depth {
                break;
            }
            if let Some(action) = current.action.as_ref() {
                actions.push(action.clone());
            }
            cursor = current.parent.as_deref();
        }

        actions.reverse();
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TextNode = SearchNode<&'static str, u32>;

    fn chain() -> Rc<TextNode> {
        let root = TextNode::root(10);
        let first = TextNode::child(&root, "x", 7);
        let second = TextNode::child(&first, "y", 4);
        TextNode::child(&second, "z", 0)
    }

    #[test]
    fn root_has_no_parent_action_or_depth() {
        let root = TextNode::root(3);
        assert!(root.is_root());
        assert!(root.action.is_none());
        assert_eq!(root.depth, 0);
        assert!(root.plan().is_empty());
    }

    #[test]
    fn plan_walks_parents_and_reverses() {
        let leaf = chain();
        assert_eq!(leaf.depth, 3);
        assert_eq!(leaf.plan(), vec!["x", "y", "z"]);
    }

    #[test]
    fn actions_since_stops_at_the_ancestor_depth() {
        let leaf = chain();
        assert_eq!(leaf.actions_since(1), vec!["y", "z"]);
        assert_eq!(leaf.actions_since(3), Vec::<&str>::new());
    }

    #[test]
    fn lineage_lists_states_from_root() {
        let leaf = chain();
        let states = leaf.lineage().iter().map(|node| node.state).collect::<Vec<_>>();
        assert_eq!(states, vec![10, 7, 4, 0]);
    }

    #[test]
    fn siblings_share_the_parent_without_copying_it() {
        let root = TextNode::root(1);
        let left = TextNode::child(&root, "l", 2);
        let right = TextNode::child(&root, "r", 3);
        assert_eq!(Rc::strong_count(&root), 3);
        drop(left);
        assert_eq!(Rc::strong_count(&root), 2);
        assert_eq!(right.plan(), vec!["r"]);
    }
}
