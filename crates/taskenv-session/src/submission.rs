const OPEN: &str = "<<SUBMISSION||";
const CLOSE: &str = "||SUBMISSION>>";

/// Extract the patch body framed by the submission sentinels (spec §6:
/// `<<SUBMISSION\|\|(.*)\|\|SUBMISSION>>`, DOTALL). The sentinels are a
/// literal, non-overlapping delimiter pair, so a direct substring search is
/// equivalent to the DOTALL regex without pulling in a regex engine for it.
pub fn extract_submission(observation: &str) -> Option<String> {
    let start = observation.find(OPEN)? + OPEN.len();
    let end = observation[start..].find(CLOSE)? + start;
    Some(observation[start..end].to_string())
}

pub fn contains_submission(observation: &str) -> bool {
    observation.contains(OPEN) && observation.contains(CLOSE)
}
