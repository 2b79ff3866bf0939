use fanout_core::{build_prompt, select_items, SelectedItem};
use pretty_assertions::assert_eq;

#[test]
fn selection_keeps_numbered_lines_in_order() {
    let input = "1. Write a haiku\n\nIntro text\n  2.   Summarize X  \n10.Translate Y\n";
    let selection = select_items(input.lines());

    assert_eq!(
        selection.items,
        vec![
            SelectedItem {
                line_number: 1,
                original: "1. Write a haiku".into(),
                text: "Write a haiku".into(),
            },
            SelectedItem {
                line_number: 4,
                original: "2.   Summarize X".into(),
                text: "Summarize X".into(),
            },
            SelectedItem {
                line_number: 5,
                original: "10.Translate Y".into(),
                text: "Translate Y".into(),
            },
        ]
    );
    assert_eq!(selection.total(), 3);
}

#[test]
fn blank_lines_are_not_reported_as_skipped() {
    let selection = select_items("\n   \n\t\nnot numbered\n".lines());
    assert!(selection.items.is_empty());
    assert_eq!(selection.skipped.len(), 1);
    assert_eq!(selection.skipped[0].line_number, 4);
    assert_eq!(selection.skipped[0].line, "not numbered");
}

#[test]
fn text_after_numbering_is_kept_verbatim() {
    let selection = select_items(["3. 2. nested numbering", "4.\tTabbed"]);
    let texts: Vec<_> = selection.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["2. nested numbering", "Tabbed"]);
}

#[test]
fn empty_input_selects_nothing() {
    let selection = select_items("".lines());
    assert_eq!(selection.total(), 0);
    assert!(selection.skipped.is_empty());
}

#[test]
fn prompt_is_prefix_then_text() {
    let selection = select_items(["7. Describe a cat"]);
    let prompt = build_prompt("Answer briefly: ", &selection.items[0]);
    assert_eq!(prompt, "Answer briefly: Describe a cat");

    let bare = build_prompt("", &selection.items[0]);
    assert_eq!(bare, "Describe a cat");
}
