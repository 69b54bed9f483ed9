//! ASCII tree rendering for the mentorship hierarchy.

use crate::salon::MentorNode;

/// One line of the tree: the master's name and experience.
fn label(node: &MentorNode) -> String {
    let name = if node.name.is_empty() {
        node.master.to_string()
    } else {
        node.name.clone()
    };
    format!("{} ({}y)", name, node.experience_years)
}

/// Render mentorship trees as ASCII art.
///
/// Example output:
/// ```text
/// Anna Nowak (12y)
/// ├── Ewa Lis (3y)
/// └── Marta Kos (6y)
///     └── Ola Wrona (1y)
/// ```
pub fn render_tree(nodes: &[MentorNode]) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(&mut output, node, "", true, true);
    }
    output
}

fn render_node(
    output: &mut String,
    node: &MentorNode,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if !is_root {
        output.push_str(prefix);
        output.push_str(if is_last { "└── " } else { "├── " });
    }
    output.push_str(&label(node));
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, trainee) in node.trainees.iter().enumerate() {
        let trainee_is_last = i == node.trainees.len() - 1;
        render_node(output, trainee, &child_prefix, trainee_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MasterId;

    fn make_node(name: &str, experience_years: u32, trainees: Vec<MentorNode>) -> MentorNode {
        MentorNode {
            master: MasterId::new(),
            name: name.to_string(),
            experience_years,
            trainees,
        }
    }

    #[test]
    fn test_single_root() {
        let tree = vec![make_node("Anna Nowak", 12, vec![])];
        assert_eq!(render_tree(&tree), "Anna Nowak (12y)\n");
    }

    #[test]
    fn test_nested_trainees() {
        let tree = vec![make_node(
            "Anna Nowak",
            12,
            vec![
                make_node("Ewa Lis", 3, vec![]),
                make_node("Marta Kos", 6, vec![make_node("Ola Wrona", 1, vec![])]),
            ],
        )];
        let expected = "Anna Nowak (12y)\n\
                        ├── Ewa Lis (3y)\n\
                        └── Marta Kos (6y)\n    \
                        └── Ola Wrona (1y)\n";
        assert_eq!(render_tree(&tree), expected);
    }

    #[test]
    fn test_unnamed_master_falls_back_to_id() {
        let node = make_node("", 2, vec![]);
        let id = node.master;
        assert_eq!(render_tree(&[node]), format!("{} (2y)\n", id));
    }

    #[test]
    fn test_multiple_roots() {
        let tree = vec![make_node("A", 5, vec![]), make_node("B", 7, vec![])];
        assert_eq!(render_tree(&tree), "A (5y)\nB (7y)\n");
    }
}
