use crate::avl_tree::node::Node;
use log::trace;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

pub type Tree<T> = Option<Box<Node<T>>>;

pub fn height<T>(tree: &Tree<T>) -> usize {
    match tree {
        None => 0,
        Some(ref node) => node.height,
    }
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.right.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    trace!("rotating left at subtree of height {}", node.height);
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut child = match node.left.take() {
        Some(child) => child,
        None => unreachable!(),
    };
    trace!("rotating right at subtree of height {}", node.height);
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

// Both subtrees must already be balanced and differ in height by at most two.
fn balance<T>(tree: &mut Tree<T>) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    if node.balance_factor() > 1 {
        if let Some(child) = node.right.take() {
            if child.balance_factor() < 0 {
                node.right = Some(rotate_right(child));
            } else {
                node.right = Some(child);
            }
        }
        node = rotate_left(node);
    } else if node.balance_factor() < -1 {
        if let Some(child) = node.left.take() {
            if child.balance_factor() > 0 {
                node.left = Some(rotate_left(child));
            } else {
                node.left = Some(child);
            }
        }
        node = rotate_right(node);
    }

    *tree = Some(node);
}

// precondition: there exists a minimum node in the tree
fn remove_min<T>(tree: &mut Tree<T>) -> Box<Node<T>> {
    let min_node = match tree {
        Some(ref mut node) if node.left.is_some() => remove_min(&mut node.left),
        _ => {
            let mut node = match tree.take() {
                Some(node) => node,
                None => unreachable!(),
            };
            *tree = node.right.take();
            return node;
        },
    };

    balance(tree);
    min_node
}

fn combine_subtrees<T>(left_tree: Tree<T>, mut right_tree: Tree<T>) -> Tree<T> {
    let mut new_root = remove_min(&mut right_tree);
    new_root.left = left_tree;
    new_root.right = right_tree;
    Some(new_root)
}

pub fn insert<T>(tree: &mut Tree<T>, new_node: Node<T>) -> Option<T>
where
    T: Ord,
{
    let ret = match tree {
        Some(ref mut node) => match new_node.value.cmp(&node.value) {
            Ordering::Less => insert(&mut node.left, new_node),
            Ordering::Greater => insert(&mut node.right, new_node),
            Ordering::Equal => return Some(mem::replace(&mut node.value, new_node.value)),
        },
        None => {
            *tree = Some(Box::new(new_node));
            return None;
        },
    };

    balance(tree);
    ret
}

pub fn remove<T, V>(tree: &mut Tree<T>, key: &V) -> Option<T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let ret = match tree.take() {
        Some(mut node) => match key.cmp(node.value.borrow()) {
            Ordering::Less => {
                let ret = remove(&mut node.left, key);
                *tree = Some(node);
                ret
            },
            Ordering::Greater => {
                let ret = remove(&mut node.right, key);
                *tree = Some(node);
                ret
            },
            Ordering::Equal => {
                let Node { value, left, right, .. } = *node;
                *tree = match right {
                    None => left,
                    right => combine_subtrees(left, right),
                };
                Some(value)
            },
        },
        None => return None,
    };

    balance(tree);
    ret
}

pub fn get<'a, T, V>(tree: &'a Tree<T>, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut curr = tree;
    while let Some(node) = curr {
        match key.cmp(node.value.borrow()) {
            Ordering::Less => curr = &node.left,
            Ordering::Greater => curr = &node.right,
            Ordering::Equal => return Some(&node.value),
        }
    }
    None
}

pub fn min<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref left_node) = curr.left {
            curr = left_node;
        }
        &curr.value
    })
}

pub fn max<T>(tree: &Tree<T>) -> Option<&T> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(ref right_node) = curr.right {
            curr = right_node;
        }
        &curr.value
    })
}

pub fn in_order<T, F>(tree: &Tree<T>, visit: &mut F)
where
    F: FnMut(&T),
{
    if let Some(node) = tree {
        in_order(&node.left, visit);
        visit(&node.value);
        in_order(&node.right, visit);
    }
}

// Releases children before their parent.
pub fn destroy<T>(tree: Tree<T>) {
    if let Some(node) = tree {
        let Node { value, left, right, .. } = *node;
        destroy(left);
        destroy(right);
        mem::drop(value);
    }
}

/// Walks the whole tree and panics if a cached height is stale, a node is out of balance, or
/// the values are out of order. Returns the number of nodes.
#[cfg(any(test, feature = "consistency_check"))]
pub fn check_consistency<T>(tree: &Tree<T>) -> usize
where
    T: Ord,
{
    fn check<'a, T>(tree: &'a Tree<T>, lower: Option<&'a T>, upper: Option<&'a T>) -> (usize, usize)
    where
        T: Ord,
    {
        match tree {
            None => (0, 0),
            Some(node) => {
                if let Some(lower) = lower {
                    assert!(*lower < node.value, "value is not greater than its left ancestor");
                }
                if let Some(upper) = upper {
                    assert!(node.value < *upper, "value is not less than its right ancestor");
                }
                let (left_height, left_len) = check(&node.left, lower, Some(&node.value));
                let (right_height, right_len) = check(&node.right, Some(&node.value), upper);
                assert_eq!(node.height, left_height.max(right_height) + 1, "stale cached height");
                assert!(node.balance_factor().abs() <= 1, "node is out of balance");
                (node.height, left_len + right_len + 1)
            },
        }
    }

    check(tree, None, None).1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(values: &[u32]) -> Tree<u32> {
        let mut tree = None;
        for value in values {
            insert(&mut tree, Node::new(*value));
            check_consistency(&tree);
        }
        tree
    }

    fn collect(tree: &Tree<u32>) -> Vec<u32> {
        let mut values = Vec::new();
        in_order(tree, &mut |value| values.push(*value));
        values
    }

    fn root_value(tree: &Tree<u32>) -> Option<u32> {
        tree.as_ref().map(|node| node.value)
    }

    #[test]
    fn test_height_empty() {
        let tree: Tree<u32> = None;
        assert_eq!(height(&tree), 0);
    }

    #[test]
    fn test_rotate_left() {
        let tree = build(&[10, 20, 30]);
        assert_eq!(root_value(&tree), Some(20));
        assert_eq!(height(&tree), 2);
        assert_eq!(collect(&tree), vec![10, 20, 30]);
    }

    #[test]
    fn test_rotate_right() {
        let tree = build(&[30, 20, 10]);
        assert_eq!(root_value(&tree), Some(20));
        assert_eq!(height(&tree), 2);
        assert_eq!(collect(&tree), vec![10, 20, 30]);
    }

    #[test]
    fn test_rotate_right_left() {
        let tree = build(&[30, 10, 20]);
        assert_eq!(root_value(&tree), Some(20));
        assert_eq!(collect(&tree), vec![10, 20, 30]);
    }

    #[test]
    fn test_rotate_left_right() {
        let tree = build(&[10, 30, 20]);
        assert_eq!(root_value(&tree), Some(20));
        assert_eq!(collect(&tree), vec![10, 20, 30]);
    }

    #[test]
    fn test_insert_equal_replaces() {
        let mut tree = build(&[1, 2, 3]);
        assert_eq!(insert(&mut tree, Node::new(2)), Some(2));
        assert_eq!(check_consistency(&tree), 3);
    }

    #[test]
    fn test_remove_with_successor() {
        let mut tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(remove(&mut tree, &3), Some(3));
        check_consistency(&tree);
        assert_eq!(collect(&tree), vec![1, 4, 5, 7, 8, 9]);

        let left_value = tree.as_ref().and_then(|node| node.left.as_ref()).map(|node| node.value);
        assert_eq!(left_value, Some(4));
    }

    #[test]
    fn test_remove_root() {
        let mut tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(remove(&mut tree, &5), Some(5));
        assert_eq!(root_value(&tree), Some(7));
        assert_eq!(check_consistency(&tree), 6);
    }

    #[test]
    fn test_remove_without_right_child() {
        let mut tree = build(&[2, 1]);
        assert_eq!(remove(&mut tree, &2), Some(2));
        assert_eq!(root_value(&tree), Some(1));
        assert_eq!(height(&tree), 1);
    }

    #[test]
    fn test_remove_min_rebalances() {
        let mut tree = build(&[2, 1, 3, 4]);
        let min_node = remove_min(&mut tree);
        assert_eq!(min_node.value, 1);
        assert_eq!(root_value(&tree), Some(3));
        assert_eq!(check_consistency(&tree), 3);
        assert_eq!(collect(&tree), vec![2, 3, 4]);
    }

    #[test]
    fn test_remove_rebalances_ancestor() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7, 8]);
        remove(&mut tree, &1);
        remove(&mut tree, &3);
        assert_eq!(root_value(&tree), Some(6));
        check_consistency(&tree);
        assert_eq!(collect(&tree), vec![2, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_remove_missing() {
        let mut tree = build(&[1, 2, 3]);
        assert_eq!(remove(&mut tree, &42), None);
        assert_eq!(root_value(&tree), Some(2));
        assert_eq!(collect(&tree), vec![1, 2, 3]);
    }

    #[test]
    fn test_get() {
        let tree = build(&[1, 2, 3]);
        assert_eq!(get(&tree, &2), Some(&2));
        assert_eq!(get(&tree, &99), None);
        assert_eq!(get(&None::<Box<Node<u32>>>, &1), None);
    }

    #[test]
    fn test_min_max() {
        let tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(min(&tree), Some(&1));
        assert_eq!(max(&tree), Some(&9));
        assert_eq!(min(&None::<Box<Node<u32>>>), None);
    }

    #[test]
    fn test_sequential_insert_height() {
        let values = (0..1023).collect::<Vec<u32>>();
        let tree = build(&values);
        assert_eq!(height(&tree), 10);
    }
}
