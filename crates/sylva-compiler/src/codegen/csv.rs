//! Line-oriented CSV export of the forest structure.

use sylva_core::Forest;

/// `r,<root>` per tree, then `n,<feature>,<threshold>,<left>,<right>` per
/// decision node, references encoded. Lines are joined by `\r\n`.
pub fn to_csv(forest: &Forest) -> String {
    let roots = forest.roots().iter().map(|root| format!("r,{root}"));
    let nodes = forest.nodes().iter().map(|node| {
        format!(
            "n,{},{:?},{},{}",
            node.feature, node.threshold, node.left, node.right
        )
    });
    roots.chain(nodes).collect::<Vec<_>>().join("\r\n")
}
