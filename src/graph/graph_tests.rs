use super::*;

// ========================================================================
// TensorMeta adapter
// ========================================================================

#[test]
fn test_tensor_meta_accessors() {
    let t = TensorMeta::new("F16", vec![2, 3]);
    assert_eq!(t.shape(), Ok(Some(vec![2, 3])));
    assert_eq!(t.dtype(), Ok(Some("F16".to_string())));
    assert_eq!(t.element_count(), Ok(Some(6)));
    assert_eq!(t.element_size(), Ok(Some(2)));
    assert_eq!(t.device(), Ok(Some("cpu".to_string())));
}

#[test]
fn test_tensor_meta_unknown_dtype_has_no_element_size() {
    let t = TensorMeta::new("Q4_K", vec![32]);
    assert_eq!(t.element_size(), Ok(None));
}

#[test]
fn test_tensor_meta_with_device() {
    let t = TensorMeta::new("F32", vec![1]).with_device("cuda:0");
    assert_eq!(t.device, "cuda:0");
}

#[test]
fn test_default_element_count_of_scalar_is_one() {
    let t = TensorMeta::new("F32", vec![]);
    assert_eq!(t.element_count(), Ok(Some(1)));
}

#[test]
fn test_access_error_display() {
    let err = TensorAccessError::new("dtype", "storage was released");
    assert_eq!(err.to_string(), "dtype: storage was released");
}

// ========================================================================
// Node classification
// ========================================================================

#[test]
fn test_type_names() {
    assert_eq!(Node::mapping(Vec::<(String, Node)>::new()).type_name(), "dict");
    assert_eq!(Node::from(TensorMeta::new("F32", vec![1])).type_name(), "Tensor");
    assert_eq!(Node::from("x").type_name(), "str");
    assert_eq!(Node::from(3_i64).type_name(), "int");
    assert_eq!(Node::from(0.5).type_name(), "float");
    assert_eq!(Node::from(true).type_name(), "bool");
    assert_eq!(Node::sequence(vec![]).type_name(), "list");
    assert_eq!(Node::opaque("Adam", "Adam()").type_name(), "Adam");
}

#[test]
fn test_mapping_preserves_insertion_order() {
    let node = Node::mapping([("z", Node::from(1_i64)), ("a", Node::from(2_i64))]);
    let keys: Vec<&str> = node
        .as_mapping()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, ["z", "a"]);
}

#[test]
fn test_as_tensor() {
    assert!(Node::from(TensorMeta::new("F32", vec![1])).as_tensor().is_some());
    assert!(Node::from(1_i64).as_tensor().is_none());
}

// ========================================================================
// Rendering
// ========================================================================

#[test]
fn test_display_primitives() {
    assert_eq!(Node::from("hello").to_string(), "hello");
    assert_eq!(Node::from(42_i64).to_string(), "42");
    assert_eq!(Node::from(1.0).to_string(), "1.0");
    assert_eq!(Node::from(false).to_string(), "False");
}

#[test]
fn test_display_containers_quote_strings() {
    let node = Node::mapping([
        ("name", Node::from("net")),
        ("sizes", Node::sequence(vec![Node::from(1_i64), Node::from("b")])),
    ]);
    assert_eq!(node.to_string(), r#"{"name": "net", "sizes": [1, "b"]}"#);
}

#[test]
fn test_display_tensor() {
    let node = Node::from(TensorMeta::new("F32", vec![4, 4]));
    assert_eq!(node.to_string(), "tensor(shape=[4, 4], dtype=F32)");
}

#[test]
fn test_display_opaque_uses_repr() {
    assert_eq!(Node::opaque("Linear", "Linear(in=4)").to_string(), "Linear(in=4)");
}

#[test]
fn test_render_collapses_containers_past_depth() {
    let node = Node::mapping([
        ("a", Node::sequence([Node::sequence([Node::from(1_i64)])])),
        ("b", Node::mapping([("c", Node::from("x"))])),
    ]);
    assert_eq!(node.render(2, 1000), r#"{"a": [[...]], "b": {"c": "x"}}"#);
    assert_eq!(node.render(1, 1000), r#"{"a": [...], "b": {...}}"#);
    assert_eq!(node.render(0, 1000), "{...}");
}

#[test]
fn test_render_stops_at_char_limit() {
    let node = Node::sequence((0_i64..1000).map(Node::from));
    assert_eq!(node.render(8, 7), "[0, 1, ");
    assert_eq!(Node::from("日本語").render(8, 2), "日本");
    assert_eq!(Node::from("abc").render(8, 0), "");
}

#[test]
fn test_display_of_deep_chain_is_bounded() {
    let mut node = Node::from(0_i64);
    for _ in 0..200 {
        node = Node::sequence([node]);
    }
    let text = node.to_string();
    assert!(text.starts_with(&"[".repeat(64)));
    assert!(text.contains("[...]"));
    assert_eq!(text.len(), 64 * 2 + "[...]".len());
}
