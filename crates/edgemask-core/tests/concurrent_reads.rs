use edgemask_core::edges::EdgeTypeFilter;
use edgemask_core::node::NodeType;
use rayon::prelude::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_filters_are_send_and_sync() {
    assert_send_sync::<EdgeTypeFilter>();
    assert_send_sync::<edgemask_core::nodes::NodeTypeFilter>();
}

#[test]
fn test_shared_filter_agrees_across_threads() {
    let filter: EdgeTypeFilter = "ori:snp,snp:rev+rel,rel:rev,rev:rev+dir,dir:*"
        .parse()
        .unwrap();
    let expected: Vec<bool> = (0..NodeType::COUNT * NodeType::COUNT)
        .map(|i| {
            filter.is_allowed(
                NodeType::all()[i / NodeType::COUNT],
                NodeType::all()[i % NodeType::COUNT],
            )
        })
        .collect();

    // Many readers hammering one instance through a shared reference.
    let mismatches: usize = (0..200_000usize)
        .into_par_iter()
        .filter(|&n| {
            let i = n % expected.len();
            let src = NodeType::all()[i / NodeType::COUNT];
            let dst = NodeType::all()[i % NodeType::COUNT];
            filter.is_allowed(src, dst) != expected[i]
        })
        .count();

    assert_eq!(mismatches, 0);
}
