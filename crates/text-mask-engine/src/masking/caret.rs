use super::conform::{ConformResult, index_of_first_change};

/// Where the caret should sit after an edit has been conformed.
///
/// `previous_conformed_input` is the field value before the edit, `result`
/// is what [`conform_to_mask`](super::conform::conform_to_mask) made of the
/// raw input, and `current_caret_position` is where the widget left the
/// caret once the raw edit happened. The returned offset is always within
/// `0..=result.output.chars().count()`.
///
/// The branches run in a fixed order and later ones assume the earlier
/// ones did not apply:
///
/// 1. caret at 0 stays at 0;
/// 2. an ambiguous change (first difference more than one position past
///    the caret) keeps the caret where it is;
/// 3. a partial multi-character deletion keeps the caret where it is;
/// 4. otherwise pick a starting index and seek forward to the next
///    placeholder slot on addition, or back past the previous one on
///    deletion.
pub fn adjust_caret_position(
    previous_conformed_input: &str,
    result: &ConformResult,
    current_caret_position: usize,
) -> usize {
    let conformed_len = result.output.chars().count();
    resolve(previous_conformed_input, result, current_caret_position).min(conformed_len)
}

fn resolve(previous_conformed_input: &str, result: &ConformResult, caret: usize) -> usize {
    if caret == 0 {
        return 0;
    }

    let previous: Vec<char> = previous_conformed_input.chars().collect();
    let conformed: Vec<char> = result.output.chars().collect();
    let raw: Vec<char> = result.meta.input.chars().collect();
    let placeholder: Vec<char> = result.meta.placeholder.chars().collect();
    let placeholder_char = result.meta.placeholder_char;

    let first_change = index_of_first_change(&previous, &raw);

    // e.g. (444) 444-44__ to (444) 444-444_ with the caret at 2
    let is_ambiguous_change = first_change.unwrap_or(0) as isize - caret as isize > 1;
    if is_ambiguous_change {
        log::trace!("ambiguous change at {first_change:?}, caret stays at {caret}");
        return caret;
    }

    let is_addition = raw.len() >= previous.len();
    let is_multi_char_edit = previous.len().abs_diff(raw.len()) > 1;
    let is_first_char = raw.len() == 1;

    // Selecting part of the value and deleting it, e.g. `(123) 432-4348`
    // to `() 432-4348`. Not handled beyond keeping the caret in place.
    let is_partial_multi_char_edit = is_multi_char_edit && !is_addition && !is_first_char;
    if is_partial_multi_char_edit {
        return caret;
    }

    // For (111), typing `f` into (1__) leaves the output unchanged.
    let possibly_has_rejected_char = is_addition && (previous == conformed || conformed == placeholder);

    // The very first keystroke was a mask delimiter such as `(`.
    let only_entered_a_mask_delimiter = previous.is_empty() && conformed == placeholder;

    let base_target: &[char] = if is_multi_char_edit || is_first_char {
        &conformed
    } else {
        &placeholder
    };

    let is_char_inserted_in_non_placeholder_index = first_change
        .and_then(|i| placeholder.get(i))
        .is_none_or(|&c| c != placeholder_char);

    let mut starting_search_index = caret;
    if is_multi_char_edit || is_first_char {
        starting_search_index = 0;
    } else if possibly_has_rejected_char {
        starting_search_index -= 1;
    } else if is_addition
        && let Some(slot) = (caret..placeholder.len()).find(|&i| placeholder[i] == placeholder_char)
    {
        let needs_adjustment_by_one =
            is_char_inserted_in_non_placeholder_index && !only_entered_a_mask_delimiter;
        starting_search_index = slot + usize::from(needs_adjustment_by_one);
    }

    if is_addition || is_first_char {
        // Seek forward to the next slot or the end of the target.
        (starting_search_index..=base_target.len())
            .find(|&i| i == base_target.len() || base_target[i] == placeholder_char)
            .map_or(conformed.len(), |i| i.min(conformed.len()))
    } else {
        // Seek back to just after the previous slot.
        (0..=starting_search_index)
            .rev()
            .find(|&i| i == 0 || base_target.get(i - 1) == Some(&placeholder_char))
            .unwrap_or(0)
    }
}
