//! Bracket-repetition prompt compiler.

use crate::model::prompt::Topic;
use log::warn;
use std::ops::Deref;

const FRAGMENT_SEPARATOR: &str = ", ";
/// Deepest bracket nesting emitted for one fragment.
pub const MAX_WRAP_DEPTH: u32 = 100;

/// Output pair pushed to the host page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledPrompt {
    /// Cleaned base prompt followed by every active positive fragment.
    pub prompt_text: String,
    /// Every active undesired fragment; never carries the base prompt.
    pub undesired_text: String,
}

/// Compiles the base prompt and topics into both output strings.
///
/// Positive items with level `n > 0` are wrapped in `n` brace pairs, level
/// `n < 0` in `|n|` square-bracket pairs. Undesired items with level `n > 0`
/// are wrapped in `n` parenthesis pairs. Level 0 stays unwrapped in both
/// lists. Fragments that clean to an empty string are still emitted.
/// Nesting is capped at [`MAX_WRAP_DEPTH`] pairs.
pub fn compile_prompt<T>(base_prompt: &str, topics: &[T]) -> CompiledPrompt
where
    T: Deref<Target = Topic>,
{
    let cleaned_base = clean_fragment(base_prompt);
    let mut prompt_text = String::new();
    if !cleaned_base.is_empty() {
        prompt_text.push_str(cleaned_base);
        prompt_text.push_str(FRAGMENT_SEPARATOR);
    }

    let active = || topics.iter().filter(|topic| topic.active);

    let positive = active()
        .flat_map(|topic| topic.items.iter())
        .map(|item| {
            let fragment = clean_fragment(&item.prompt);
            if item.level > 0 {
                wrap(fragment, item.level.unsigned_abs(), '{', '}')
            } else if item.level < 0 {
                wrap(fragment, item.level.unsigned_abs(), '[', ']')
            } else {
                fragment.to_string()
            }
        })
        .collect::<Vec<_>>();

    let undesired = active()
        .flat_map(|topic| topic.undesired.iter())
        .map(|item| {
            let fragment = clean_fragment(&item.prompt);
            if item.level > 0 {
                wrap(fragment, item.level.unsigned_abs(), '(', ')')
            } else {
                fragment.to_string()
            }
        })
        .collect::<Vec<_>>();

    prompt_text.push_str(&positive.join(FRAGMENT_SEPARATOR));

    CompiledPrompt {
        prompt_text,
        undesired_text: undesired.join(FRAGMENT_SEPARATOR),
    }
}

/// Trims whitespace and strips the trailing run of commas.
///
/// Whitespace between trailing commas is stripped with them, so `"cat, ,"`
/// cleans to `"cat"`.
pub fn clean_fragment(value: &str) -> &str {
    value
        .trim()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
}

fn wrap(fragment: &str, depth: u32, open: char, close: char) -> String {
    if depth > MAX_WRAP_DEPTH {
        warn!(
            "event=compile module=compiler status=clamped level={depth} max_level={MAX_WRAP_DEPTH}"
        );
    }
    let depth = depth.min(MAX_WRAP_DEPTH) as usize;
    let mut wrapped = String::with_capacity(fragment.len() + depth * 2);
    wrapped.extend(std::iter::repeat(open).take(depth));
    wrapped.push_str(fragment);
    wrapped.extend(std::iter::repeat(close).take(depth));
    wrapped
}
