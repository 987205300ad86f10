#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{dependencies, lang, live, pick_type, props, HEADLINE, TEXT};
use proptest::prelude::*;
use subgroups_core::model::PropertyValues;
use subgroups_core::{
    apply_batch, CommandBatch, CommandKind, InMemoryContentRepository, PublishedEvents,
    Registrations,
};
use subgroups_core_types::NodeAggregateId;

const LANGUAGES: [&str; 4] = ["en", "de", "fr", "it"];

/// Per variant: (has caption, references a, references b)
type VariantShape = (bool, bool, bool);

fn build(shapes: &[VariantShape]) -> InMemoryContentRepository {
    let mut content = InMemoryContentRepository::new();
    let graph = content.graph_mut(&live());
    for (&language, &(has_caption, ref_a, ref_b)) in LANGUAGES.iter().zip(shapes) {
        let properties = if has_caption {
            props(&[("caption", language)])
        } else {
            PropertyValues::new()
        };
        graph
            .insert_node("n1", TEXT, lang(language), properties)
            .insert_node("a", "Vendor:Page", lang(language), PropertyValues::new())
            .insert_node("b", "Vendor:Page", lang(language), PropertyValues::new());

        let targets: Vec<NodeAggregateId> = [(ref_a, "a"), (ref_b, "b")]
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, id)| NodeAggregateId::from(id))
            .collect();
        graph
            .set_references(&"n1".into(), &lang(language), "related", targets)
            .unwrap();
    }
    content
}

fn rewrite(content: InMemoryContentRepository) -> CommandBatch {
    Registrations::with_defaults()
        .build_command_hooks(&dependencies(content))
        .on_after_command_handled(&pick_type(lang("en"), HEADLINE), &PublishedEvents::empty())
        .unwrap()
}

fn shapes() -> impl Strategy<Value = Vec<VariantShape>> {
    proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..=LANGUAGES.len())
}

proptest! {
    #[test]
    fn prop_clears_precede_change_and_writes_follow(shapes in shapes()) {
        let kinds = rewrite(build(&shapes)).kinds();

        let change_at: Vec<usize> = kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == CommandKind::ChangeType)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(change_at.len(), 1);
        let change_at = change_at[0];

        prop_assert!(kinds[..change_at].iter().all(|k| *k == CommandKind::ClearReferences));
        prop_assert!(kinds[change_at + 1..]
            .iter()
            .all(|k| matches!(k, CommandKind::SetProperties | CommandKind::SetReferences)));

        // table order: caption entry before related entry
        let additive = &kinds[change_at + 1..];
        let first_reference = additive
            .iter()
            .position(|k| *k == CommandKind::SetReferences)
            .unwrap_or(additive.len());
        prop_assert!(additive[first_reference..]
            .iter()
            .all(|k| *k == CommandKind::SetReferences));
    }

    #[test]
    fn prop_one_write_per_populated_variant(shapes in shapes()) {
        let batch = rewrite(build(&shapes));
        let count = |kind: CommandKind| batch.kinds().into_iter().filter(|k| *k == kind).count();

        let with_caption = shapes.iter().filter(|(caption, _, _)| *caption).count();
        let with_references = shapes.iter().filter(|(_, a, b)| *a || *b).count();

        prop_assert_eq!(count(CommandKind::SetProperties), with_caption);
        prop_assert_eq!(count(CommandKind::SetReferences), with_references);
        prop_assert_eq!(count(CommandKind::ClearReferences), with_references);
    }

    #[test]
    fn prop_replay_then_rerun_is_type_change_only(shapes in shapes()) {
        let content = build(&shapes);
        let batch = rewrite(content.clone());
        let state = apply_batch(content, &batch).unwrap();

        let graph = state.graph(&live()).unwrap();
        for language in LANGUAGES.iter().take(shapes.len()) {
            let variant = graph.variant(&"n1".into(), &lang(language)).unwrap();
            prop_assert!(!variant.references.contains_key("related"));
        }

        prop_assert_eq!(rewrite(state).kinds(), vec![CommandKind::ChangeType]);
    }
}
