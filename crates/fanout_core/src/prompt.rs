use crate::SelectedItem;

/// Prompt sent for `item`: the run-wide prefix followed by the item text.
pub fn build_prompt(prefix: &str, item: &SelectedItem) -> String {
    let mut prompt = String::with_capacity(prefix.len() + item.text.len());
    prompt.push_str(prefix);
    prompt.push_str(&item.text);
    prompt
}
