use arbor::base::Span;
use arbor::model::{IssueType, Severity};
use arbor::transform::{Factory, Record, TransformError};

use crate::helpers::class_language::{
    class, class_metamodel, class_semantics, class_transformer, field, unit,
};
use crate::helpers::node_assertions::{assert_resolved_to, get_named};

#[test]
fn test_incomplete_grammar_yields_best_effort_tree() {
    let metamodel = class_metamodel();
    let mut transformer = class_transformer(&metamodel);
    transformer
        .register(Factory::new("Method", |foreign, _, _| {
            Err(TransformError::factory(format!(
                "methods are not supported yet ({})",
                foreign.type_name()
            )))
        }))
        .unwrap();

    let input = unit([
        class(
            "A",
            None,
            vec![
                field("x", "B"),
                Record::new("Method").at(Span::from_coords(2, 4, 2, 20)),
                Record::new("Property").at(Span::from_coords(3, 4, 3, 12)),
            ],
        ),
        class("B", Some("A"), vec![]),
    ]);
    let root = transformer
        .transform(&input.into_value(), None)
        .unwrap()
        .unwrap();

    let a = get_named(&root, "ClassDecl", "A");
    let features = a.children_of("features");
    assert_eq!(features.len(), 3);
    assert!(features[1].is_error());
    assert!(!features[1].error_message().unwrap().is_empty());
    assert!(features[2].is_generic());
    assert_eq!(features[2].range(), Some(Span::from_coords(3, 4, 3, 12)));

    let issues = transformer.take_issues();
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|issue| issue.issue_type == IssueType::Translation));
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].range, Some(Span::from_coords(2, 4, 2, 20)));
    assert_eq!(issues[1].severity, Severity::Info);

    // The rest of the tree is still usable
    let semantics = class_semantics(&metamodel);
    semantics.resolve_tree(&root).unwrap();
    let b = get_named(&root, "ClassDecl", "B");
    assert_resolved_to(&b, "superclass", &a);
    assert_resolved_to(&features[0], "type", &b);
}
