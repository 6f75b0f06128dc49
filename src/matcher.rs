/// Decides whether a recognizer transcript contains the target word.
///
/// Both sides are normalized by stripping whitespace and uppercasing, so a
/// child spelling out "M - Á - M - A" still matches "Máma", and filler
/// speech around the word is tolerated. Containment, not equality: the
/// matcher is re-run on every accumulated-transcript update, and an earlier
/// miss never blocks a later hit.
pub fn matches(transcript: &str, target: &str) -> bool {
    let heard = normalize(transcript);
    let wanted = normalize(target);

    !wanted.is_empty() && heard.contains(&wanted)
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
