use std::collections::HashMap;

use crate::domain::Category;

/// Category of the first recognized symbol in `reactions`, in the order the
/// chat platform reported them.
///
/// When a message carries several recognized symbols the winner depends on
/// that order, which the platform does not guarantee.
pub fn classify<S: AsRef<str>>(
    reactions: &[S],
    types: &HashMap<String, Category>,
) -> Option<Category> {
    reactions
        .iter()
        .find_map(|r| types.get(r.as_ref()).copied())
}
