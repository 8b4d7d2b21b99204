use super::*;

#[test]
fn test_parents_resolve_to_handles() {
  let nodes = vec![
    Node::sphere(10),
    Node::cuboid(20).with_parent(10),
    Node::capsule(30).with_parent(20),
  ];
  let snapshot = SceneSnapshot::new(&nodes);

  assert_eq!(snapshot.len(), 3);
  assert_eq!(snapshot.parent_of(0), None);
  assert_eq!(snapshot.parent_of(1), Some(0));
  assert_eq!(snapshot.parent_of(2), Some(1));
  assert_eq!(snapshot.handle_of(NodeId(30)), Some(2));
  assert_eq!(snapshot.handle_of(NodeId(99)), None);
}

#[test]
fn test_dangling_parent_is_root() {
  let nodes = vec![Node::sphere(1).with_parent(404)];
  let snapshot = SceneSnapshot::new(&nodes);
  assert_eq!(snapshot.parent_of(0), None);
}

#[test]
fn test_self_parent_is_root() {
  let nodes = vec![Node::sphere(1).with_parent(1)];
  let snapshot = SceneSnapshot::new(&nodes);
  assert_eq!(snapshot.parent_of(0), None);
}

#[test]
fn test_lenient_duplicates_keep_first() {
  let nodes = vec![
    Node::sphere(1),
    Node::cuboid(1),
    Node::capsule(2).with_parent(1),
  ];
  let snapshot = SceneSnapshot::new(&nodes);
  assert_eq!(snapshot.handle_of(NodeId(1)), Some(0));
  assert_eq!(snapshot.parent_of(2), Some(0));
}

#[test]
fn test_strict_rejects_duplicates() {
  let nodes = vec![Node::sphere(1), Node::group(2), Node::cuboid(1)];
  let err = SceneSnapshot::try_new(&nodes).unwrap_err();
  assert_eq!(
    err,
    SceneError::DuplicateNode {
      id: NodeId(1),
      first: 0,
      second: 2
    }
  );
}

#[test]
fn test_has_primitives() {
  assert!(!SceneSnapshot::new(&[]).has_primitives());

  let containers = vec![Node::group(1), Node::custom(2, None)];
  assert!(!SceneSnapshot::new(&containers).has_primitives());

  let hidden = vec![Node::sphere(1).with_visible(false)];
  assert!(!SceneSnapshot::new(&hidden).has_primitives());

  let mixed = vec![Node::group(1), Node::sphere(2).with_parent(1)];
  assert!(SceneSnapshot::new(&mixed).has_primitives());
}
