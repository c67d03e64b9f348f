use super::{Mapping, Node};

/// Folds `source` into `target` key by key and returns the merged target.
///
/// Mappings present on both sides are merged recursively and sequences are
/// concatenated (target elements first). Any other pairing, scalars included,
/// is resolved in favour of `source`.
pub fn deep_merge(mut target: Mapping, source: &Mapping) -> Mapping {
    for (key, source_value) in source {
        match target.remove(key) {
            None => {
                target.insert(key.clone(), source_value.clone());
            }
            Some(target_value) => {
                target.insert(key.clone(), merge_values(target_value, source_value));
            }
        }
    }
    target
}

fn merge_values(target: Node, source: &Node) -> Node {
    match (target, source) {
        (Node::Map(target_map), Node::Map(source_map)) => {
            Node::Map(deep_merge(target_map, source_map))
        }
        (Node::List(mut target_list), Node::List(source_list)) => {
            target_list.extend(source_list.iter().cloned());
            Node::List(target_list)
        }
        (Node::Map(_), other) | (Node::List(_), other) | (Node::Scalar(_), other) => other.clone(),
    }
}

/// Convenience over [`deep_merge`] for whole documents. A non-mapping target
/// is replaced, a non-mapping source leaves the target untouched.
pub fn deep_merge_documents(target: Node, source: &Node) -> Node {
    match (target, source) {
        (Node::Map(target_map), Node::Map(source_map)) => {
            Node::Map(deep_merge(target_map, source_map))
        }
        (target, Node::List(_) | Node::Scalar(_)) => target,
        (_, source @ Node::Map(_)) => source.clone(),
    }
}
